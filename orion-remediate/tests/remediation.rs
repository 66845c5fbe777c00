use orion_devkit::{node_uri, MockConnector, MockInventory, NodeRowBuilder, TestHarness};
use orion_remediate::driver::{remediate_server, run};
use orion_remediate::fetcher::CUSTOM_PROPERTY_FIELDS_QUERY;
use orion_remediate::report::ServerStatus;
use orion_remediate::PropertyMap;
use serde_json::json;

fn props(pairs: &[(&str, &str)]) -> PropertyMap {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn core_switch() -> serde_json::Map<String, serde_json::Value> {
    NodeRowBuilder::new(1, "SW-Core01")
        .machine_type("Cisco Nexus 9000")
        .ip("10.58.0.1")
        .environment("")
        .device_type("")
        .device_function("")
        .build()
}

#[tokio::test]
async fn test_core_switch_gets_environment_and_type() {
    let harness = TestHarness::new("orion-magic").with_nodes(vec![core_switch()]);

    let report = remediate_server(&harness.inventory, false).await.unwrap();

    assert_eq!(report.status, ServerStatus::Completed);
    assert_eq!(report.nodes_scanned, 1);
    assert_eq!(report.applied, 1);

    let writes = harness.inventory.writes();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].uri, format!("{}/CustomProperties", node_uri(1)));
    assert_eq!(
        writes[0].properties,
        props(&[("Environment", "Magic"), ("Device_Type", "Data Center Switch")])
    );
}

#[tokio::test]
async fn test_field_discovery_runs_before_node_query() {
    let harness = TestHarness::new("orion-magic").with_nodes(vec![core_switch()]);

    remediate_server(&harness.inventory, true).await.unwrap();

    let queries = harness.inventory.queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0], CUSTOM_PROPERTY_FIELDS_QUERY);
    assert!(queries[1].contains("N.CustomProperties.Site AS Site"));
    assert!(queries[1].contains("FROM Orion.Nodes N"));
}

#[tokio::test]
async fn test_correct_nodes_are_not_written() {
    let nodes = vec![
        NodeRowBuilder::new(1, "SW-Core01")
            .machine_type("Cisco Nexus 9000")
            .ip("10.56.0.1")
            .environment("Dream")
            .device_type("Data Center Switch")
            .build(),
        NodeRowBuilder::new(2, "legacy-box")
            .ip("10.99.0.2")
            .environment("Wish")
            .custom("Site", json!("Port Canaveral"))
            .build(),
    ];
    let harness = TestHarness::new("orion-dream").with_nodes(nodes);

    let report = remediate_server(&harness.inventory, false).await.unwrap();

    assert_eq!(report.nodes_scanned, 2);
    assert!(report.patches.is_empty());
    harness.assert_written(&[]);
}

#[tokio::test]
async fn test_stale_environment_is_corrected() {
    let nodes = vec![NodeRowBuilder::new(3, "SW-Core02")
        .machine_type("Cisco Nexus 9000")
        .ip("10.56.0.2")
        .environment("Wish")
        .device_type("Data Center Switch")
        .build()];
    let harness = TestHarness::new("orion-dream").with_nodes(nodes);

    remediate_server(&harness.inventory, false).await.unwrap();

    let writes = harness.inventory.writes();
    assert_eq!(writes[0].properties, props(&[("Environment", "Dream")]));
}

#[tokio::test]
async fn test_write_failure_does_not_stop_the_batch() {
    let nodes = vec![
        NodeRowBuilder::new(1, "deck4-brightsign-1")
            .machine_type("BrightSign XT1144")
            .ip("10.217.4.1")
            .build(),
        NodeRowBuilder::new(2, "deck5-brightsign-2")
            .machine_type("BrightSign XT1144")
            .ip("10.217.5.2")
            .build(),
    ];
    let inventory = MockInventory::new("orion-lhp")
        .with_custom_fields(["Environment", "Device_Type", "Device_Function"])
        .with_nodes(nodes)
        .fail_writes_for(node_uri(1));

    let report = remediate_server(&inventory, false).await.unwrap();

    assert_eq!(report.patches.len(), 2);
    assert_eq!(report.applied, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].caption, "deck4-brightsign-1");

    let writes = inventory.writes();
    assert_eq!(writes.len(), 1);
    assert!(writes[0].uri.starts_with(&node_uri(2)));
    assert_eq!(
        writes[0].properties,
        props(&[
            ("Environment", "LightHouse Point"),
            ("Device_Type", "Digital Signage"),
            ("Device_Function", "Brightsign"),
        ])
    );
}

#[tokio::test]
async fn test_dry_run_builds_patches_without_writing() {
    let harness = TestHarness::new("orion-magic").with_nodes(vec![core_switch()]);

    let report = remediate_server(&harness.inventory, true).await.unwrap();

    assert_eq!(report.patches.len(), 1);
    assert_eq!(report.applied, 0);
    harness.assert_written(&[]);
}

#[tokio::test]
async fn test_rows_without_uri_are_skipped() {
    let mut broken = core_switch();
    broken.remove("Uri");
    let harness = TestHarness::new("orion-magic").with_nodes(vec![broken, core_switch()]);

    let report = remediate_server(&harness.inventory, false).await.unwrap();

    assert_eq!(report.nodes_scanned, 1);
    harness.assert_written(&[node_uri(1)]);
}

#[tokio::test]
async fn test_unreachable_and_failing_servers_are_skipped() {
    let good = MockInventory::new("orion-good")
        .with_custom_fields(["Environment"])
        .with_nodes(vec![core_switch()]);
    let broken = MockInventory::new("orion-broken").fail_queries();
    let connector = MockConnector::new()
        .with_server(broken)
        .with_server(good.clone())
        .unreachable("orion-down");

    let hosts = vec![
        "orion-down".to_string(),
        "orion-broken".to_string(),
        "orion-good".to_string(),
    ];
    let report = run(&connector, &hosts, false).await;

    assert_eq!(connector.attempts(), hosts);
    assert_eq!(report.servers.len(), 3);
    assert!(matches!(&report.servers[0].status, ServerStatus::Failed { kind, .. } if kind == "connection"));
    assert!(matches!(&report.servers[1].status, ServerStatus::Failed { kind, .. } if kind == "query"));
    assert_eq!(report.servers[2].status, ServerStatus::Completed);
    assert_eq!(report.servers[2].applied, 1);
    assert_eq!(good.writes().len(), 1);
    assert!(report.has_failures());
    assert!(report.finished_at.is_some());
}

#[tokio::test]
async fn test_clean_run_has_no_failures() {
    let harness = TestHarness::new("orion-magic").with_nodes(vec![core_switch()]);
    let report = run(&harness.connector(), &["orion-magic".to_string()], false).await;

    assert!(!report.has_failures());
    assert_eq!(report.total_applied(), 1);
    assert_eq!(report.total_failed(), 0);
}
