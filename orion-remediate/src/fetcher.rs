//! Node fetcher: discovers the node custom property columns, then pulls every
//! node with its raw attributes and all custom properties.

use tracing::{debug, warn};

use crate::error::OrionError;
use crate::inventory::Inventory;
use crate::models::{DerivedField, NodeRecord};

pub const CUSTOM_PROPERTY_FIELDS_QUERY: &str =
    "SELECT Field FROM Orion.CustomProperty WHERE TargetEntity = 'Orion.NodesCustomProperties'";

const NODE_COLUMNS: [&str; 5] = ["Uri", "Caption", "Vendor", "MachineType", "IPAddress"];

/// Names of the node custom property columns defined on the server.
pub async fn list_custom_property_fields(inventory: &dyn Inventory) -> Result<Vec<String>, OrionError> {
    let rows = inventory.query(CUSTOM_PROPERTY_FIELDS_QUERY).await?;
    Ok(rows
        .iter()
        .filter_map(|row| row.get("Field").and_then(|v| v.as_str()))
        .map(str::to_string)
        .collect())
}

/// SWQL selecting the static node columns, the classification fields and the
/// given custom fields. Duplicate and non-identifier names are dropped.
pub fn build_node_query(custom_fields: &[String]) -> String {
    let mut fields: Vec<String> = DerivedField::ALL
        .iter()
        .map(|f| f.property().to_string())
        .collect();

    for field in custom_fields {
        if !is_identifier(field) {
            warn!(field = %field, "skipping custom property with unsupported name");
            continue;
        }
        if !fields.iter().any(|f| f.eq_ignore_ascii_case(field)) {
            fields.push(field.clone());
        }
    }

    let mut columns: Vec<String> = NODE_COLUMNS.iter().map(|c| format!("N.{c}")).collect();
    columns.extend(
        fields
            .iter()
            .map(|f| format!("N.CustomProperties.{f} AS {f}")),
    );

    format!("SELECT {} FROM Orion.Nodes N", columns.join(", "))
}

/// Fetches all nodes. Rows that cannot be parsed are logged and skipped.
pub async fn fetch_nodes(inventory: &dyn Inventory) -> Result<Vec<NodeRecord>, OrionError> {
    let fields = list_custom_property_fields(inventory).await?;
    debug!(host = inventory.host(), count = fields.len(), "custom property fields");

    let query = build_node_query(&fields);
    let rows = inventory.query(&query).await?;

    let mut nodes = Vec::with_capacity(rows.len());
    for row in &rows {
        match NodeRecord::from_row(row) {
            Ok(node) => nodes.push(node),
            Err(e) => warn!(host = inventory.host(), "skipping row: {e}"),
        }
    }
    Ok(nodes)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
