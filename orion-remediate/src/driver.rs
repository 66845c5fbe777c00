/**
 * DRIVER - Runs the remediation across servers
 *
 * FLOW (per server, strictly one after another) :
 * connect -> fetch nodes -> classify + diff -> apply (unless dry run)
 *
 * A connection or query failure skips the server. A write failure skips the
 * node. Neither stops the run.
 */

use tracing::{error, info, info_span, Instrument};

use crate::applier::{apply_updates, ApplySummary};
use crate::diff::build_update_list;
use crate::error::OrionError;
use crate::fetcher::fetch_nodes;
use crate::inventory::{Connector, Inventory};
use crate::report::{RunReport, ServerReport};

/// Remediates one connected server. Only fetch errors are returned.
pub async fn remediate_server(inventory: &dyn Inventory, dry_run: bool) -> Result<ServerReport, OrionError> {
    let mut nodes = fetch_nodes(inventory).await?;
    info!("fetched {} nodes", nodes.len());

    let patches = build_update_list(&mut nodes);
    info!("{} nodes need an update", patches.len());

    let summary = if dry_run {
        ApplySummary::default()
    } else {
        apply_updates(inventory, patches.clone()).await
    };

    Ok(ServerReport::completed(inventory.host(), nodes.len(), patches, summary))
}

pub async fn run(connector: &dyn Connector, hosts: &[String], dry_run: bool) -> RunReport {
    let mut report = RunReport::begin(dry_run);
    info!(run_id = %report.run_id, servers = hosts.len(), dry_run, "starting remediation");

    for host in hosts {
        let span = info_span!("server", host = %host);
        let server = async {
            let inventory = match connector.connect(host).await {
                Ok(inventory) => inventory,
                Err(e) => {
                    error!("connection failed: {e}");
                    return ServerReport::failed(host, &e);
                }
            };
            match remediate_server(inventory.as_ref(), dry_run).await {
                Ok(server) => server,
                Err(e) => {
                    error!("remediation aborted: {e}");
                    ServerReport::failed(host, &e)
                }
            }
        }
        .instrument(span)
        .await;
        report.servers.push(server);
    }

    report.finish();
    report
}
