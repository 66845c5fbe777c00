/*!
Builders for SWQL node rows as returned by the node query
*/

use orion_remediate::Row;
use serde_json::{json, Value};

/// Builds one `Orion.Nodes` row. Unset columns are returned as JSON null,
/// like SWIS does.
#[derive(Debug, Clone)]
pub struct NodeRowBuilder {
    row: Row,
}

impl NodeRowBuilder {
    pub fn new(node_id: u32, caption: &str) -> Self {
        let mut row = Row::new();
        row.insert("Uri".into(), json!(node_uri(node_id)));
        row.insert("Caption".into(), json!(caption));
        for column in [
            "Vendor",
            "MachineType",
            "IPAddress",
            "Environment",
            "Device_Type",
            "Device_Function",
        ] {
            row.insert(column.into(), Value::Null);
        }
        Self { row }
    }

    pub fn vendor(self, vendor: &str) -> Self {
        self.set("Vendor", json!(vendor))
    }

    pub fn machine_type(self, machine_type: &str) -> Self {
        self.set("MachineType", json!(machine_type))
    }

    pub fn ip(self, ip: &str) -> Self {
        self.set("IPAddress", json!(ip))
    }

    pub fn environment(self, value: &str) -> Self {
        self.set("Environment", json!(value))
    }

    pub fn device_type(self, value: &str) -> Self {
        self.set("Device_Type", json!(value))
    }

    pub fn device_function(self, value: &str) -> Self {
        self.set("Device_Function", json!(value))
    }

    /// Any other custom property column.
    pub fn custom(self, field: &str, value: Value) -> Self {
        self.set(field, value)
    }

    pub fn build(self) -> Row {
        self.row
    }

    fn set(mut self, column: &str, value: Value) -> Self {
        self.row.insert(column.into(), value);
        self
    }
}

pub fn node_uri(node_id: u32) -> String {
    format!("swis://orion.test/Orion/Orion.Nodes/NodeID={node_id}")
}
