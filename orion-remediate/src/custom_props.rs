//! Node custom property administration: list, create, delete.

use clap::ValueEnum;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::error::OrionError;
use crate::inventory::Inventory;
use crate::models::DerivedField;

pub const NODES_CUSTOM_PROPERTIES: &str = "Orion.NodesCustomProperties";

pub const LIST_QUERY: &str = "SELECT Field, DataType, MaxLength, Description FROM Orion.CustomProperty \
     WHERE TargetEntity = 'Orion.NodesCustomProperties' ORDER BY Field";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomProperty {
    pub field: String,
    pub data_type: String,
    pub max_length: Option<u64>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PropertyType {
    String,
    Integer,
    Float,
    Datetime,
    Boolean,
}

impl PropertyType {
    pub fn swis_name(self) -> &'static str {
        match self {
            PropertyType::String => "string",
            PropertyType::Integer => "integer",
            PropertyType::Float => "float",
            PropertyType::Datetime => "datetime",
            PropertyType::Boolean => "boolean",
        }
    }
}

pub async fn list_custom_properties(inventory: &dyn Inventory) -> Result<Vec<CustomProperty>, OrionError> {
    let rows = inventory.query(LIST_QUERY).await?;
    Ok(rows
        .iter()
        .filter_map(|row| {
            let field = row.get("Field")?.as_str()?.to_string();
            Some(CustomProperty {
                field,
                data_type: row.get("DataType").and_then(Value::as_str).unwrap_or("").to_string(),
                max_length: row.get("MaxLength").and_then(Value::as_u64),
                description: row.get("Description").and_then(Value::as_str).unwrap_or("").to_string(),
            })
        })
        .collect())
}

/// `size` only applies to string properties; SWIS uses 4000 when unset.
pub async fn create_custom_property(
    inventory: &dyn Inventory,
    name: &str,
    description: &str,
    value_type: PropertyType,
    size: Option<u32>,
) -> Result<(), OrionError> {
    let size = match value_type {
        PropertyType::String => json!(size.unwrap_or(4000)),
        _ => Value::Null,
    };
    let args = vec![
        json!(name),
        json!(description),
        json!(value_type.swis_name()),
        size,
        Value::Null, // ValidRange
        Value::Null, // Parser
        Value::Null, // Header
        Value::Null, // Alignment
        Value::Null, // Format
        Value::Null, // Units
    ];
    inventory
        .invoke(NODES_CUSTOM_PROPERTIES, "CreateCustomProperty", args)
        .await?;
    info!(host = inventory.host(), property = name, "custom property created");
    Ok(())
}

/// The classification fields are protected unless `force` is set.
pub async fn delete_custom_property(inventory: &dyn Inventory, name: &str, force: bool) -> Result<(), OrionError> {
    if DerivedField::is_derived(name) && !force {
        return Err(OrionError::Config(format!(
            "{name} is used by the remediation, pass --force to delete it"
        )));
    }
    inventory
        .invoke(NODES_CUSTOM_PROPERTIES, "DeleteCustomProperty", vec![json!(name)])
        .await?;
    info!(host = inventory.host(), property = name, "custom property deleted");
    Ok(())
}
