/*!
Test harness: one mock server preloaded with nodes, plus logging setup
*/

use crate::mock_inventory::{MockConnector, MockInventory};
use orion_remediate::{Inventory, Row};

pub const DEFAULT_CUSTOM_FIELDS: [&str; 4] = ["Environment", "Device_Type", "Device_Function", "Site"];

pub struct TestHarness {
    pub inventory: MockInventory,
}

impl TestHarness {
    pub fn new(host: &str) -> Self {
        env_logger::builder().is_test(true).try_init().ok();

        Self {
            inventory: MockInventory::new(host).with_custom_fields(DEFAULT_CUSTOM_FIELDS),
        }
    }

    pub fn with_nodes(mut self, nodes: Vec<Row>) -> Self {
        self.inventory = self.inventory.with_nodes(nodes);
        self
    }

    /// Connector that only knows this harness' server.
    pub fn connector(&self) -> MockConnector {
        MockConnector::new().with_server(self.inventory.clone())
    }

    /// Asserts that exactly the given node URIs were written, in order.
    pub fn assert_written(&self, node_uris: &[String]) {
        let written: Vec<String> = self
            .inventory
            .writes()
            .into_iter()
            .map(|w| w.uri.trim_end_matches("/CustomProperties").to_string())
            .collect();
        assert_eq!(written, node_uris, "unexpected writes on {}", self.inventory.host());
    }
}
