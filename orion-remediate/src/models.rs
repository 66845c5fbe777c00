use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::OrionError;

/// One row returned by a SWQL query.
pub type Row = Map<String, Value>;

/// Property name -> new value, as sent in a custom property write.
pub type PropertyMap = BTreeMap<String, String>;

/// The three classification custom properties maintained by the remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DerivedField {
    Environment,
    DeviceType,
    DeviceFunction,
}

impl DerivedField {
    pub const ALL: [DerivedField; 3] = [
        DerivedField::Environment,
        DerivedField::DeviceType,
        DerivedField::DeviceFunction,
    ];

    /// Custom property column name on `Orion.NodesCustomProperties`.
    pub fn property(self) -> &'static str {
        match self {
            DerivedField::Environment => "Environment",
            DerivedField::DeviceType => "Device_Type",
            DerivedField::DeviceFunction => "Device_Function",
        }
    }

    pub fn is_derived(name: &str) -> bool {
        Self::ALL.iter().any(|f| f.property().eq_ignore_ascii_case(name))
    }
}

/// A monitored node as seen by the remediation.
///
/// Known columns are typed; every other custom property the query returned
/// lands in `custom`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub uri: String,
    pub caption: String,
    pub vendor: Option<String>,
    pub machine_type: Option<String>,
    pub ip_address: Option<String>,
    /// IPv4 octets as strings; all empty when the address is missing or not IPv4.
    pub octets: [String; 4],
    pub environment: Option<String>,
    pub device_type: Option<String>,
    pub device_function: Option<String>,
    pub custom: BTreeMap<String, Value>,
}

impl NodeRecord {
    /// Builds a record from a query row. `Uri` is mandatory, everything else
    /// is optional.
    pub fn from_row(row: &Row) -> Result<Self, OrionError> {
        let uri = text(row.get("Uri"))
            .filter(|u| !u.is_empty())
            .ok_or_else(|| OrionError::Query("row without Uri".into()))?;

        let ip_address = text(row.get("IPAddress"));
        let octets = split_octets(ip_address.as_deref());

        let mut custom = BTreeMap::new();
        for (key, value) in row {
            if !KNOWN_COLUMNS.contains(&key.as_str()) {
                custom.insert(key.clone(), value.clone());
            }
        }

        Ok(Self {
            uri,
            caption: text(row.get("Caption")).unwrap_or_default(),
            vendor: text(row.get("Vendor")),
            machine_type: text(row.get("MachineType")),
            ip_address,
            octets,
            environment: text(row.get("Environment")),
            device_type: text(row.get("Device_Type")),
            device_function: text(row.get("Device_Function")),
            custom,
        })
    }

    /// Octet by 1-based position, as in `Octet1..Octet4`.
    pub fn octet(&self, position: usize) -> &str {
        position
            .checked_sub(1)
            .and_then(|i| self.octets.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn derived(&self, field: DerivedField) -> Option<&str> {
        match field {
            DerivedField::Environment => self.environment.as_deref(),
            DerivedField::DeviceType => self.device_type.as_deref(),
            DerivedField::DeviceFunction => self.device_function.as_deref(),
        }
    }

    pub fn set_derived(&mut self, field: DerivedField, value: Option<String>) {
        match field {
            DerivedField::Environment => self.environment = value,
            DerivedField::DeviceType => self.device_type = value,
            DerivedField::DeviceFunction => self.device_function = value,
        }
    }
}

const KNOWN_COLUMNS: [&str; 8] = [
    "Uri",
    "Caption",
    "Vendor",
    "MachineType",
    "IPAddress",
    "Environment",
    "Device_Type",
    "Device_Function",
];

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn split_octets(ip: Option<&str>) -> [String; 4] {
    let parts: Vec<&str> = ip.map(|s| s.trim().split('.').collect()).unwrap_or_default();
    if parts.len() != 4 {
        return Default::default();
    }
    [
        parts[0].to_string(),
        parts[1].to_string(),
        parts[2].to_string(),
        parts[3].to_string(),
    ]
}

/// A pending custom property write for one node. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdatePatch {
    uri: String,
    caption: String,
    properties: PropertyMap,
}

impl UpdatePatch {
    /// Returns `None` when there is nothing to write.
    pub fn new(uri: impl Into<String>, caption: impl Into<String>, properties: PropertyMap) -> Option<Self> {
        if properties.is_empty() {
            return None;
        }
        Some(Self {
            uri: uri.into(),
            caption: caption.into(),
            properties,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: Value) -> Row {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_from_row_splits_octets_and_keeps_custom_fields() {
        let node = NodeRecord::from_row(&row(json!({
            "Uri": "swis://orion/Orion/Orion.Nodes/NodeID=7",
            "Caption": "SW-Core01",
            "MachineType": "Cisco Nexus 9000",
            "IPAddress": "10.58.1.2",
            "Environment": null,
            "Device_Type": "",
            "Site": "Port Canaveral"
        })))
        .unwrap();

        assert_eq!(node.octet(1), "10");
        assert_eq!(node.octet(2), "58");
        assert_eq!(node.octet(4), "2");
        assert_eq!(node.environment, None);
        assert_eq!(node.device_type.as_deref(), Some(""));
        assert_eq!(node.custom.get("Site"), Some(&json!("Port Canaveral")));
        assert!(!node.custom.contains_key("Caption"));
    }

    #[test]
    fn test_non_ipv4_address_gives_empty_octets() {
        let node = NodeRecord::from_row(&row(json!({
            "Uri": "swis://orion/Orion/Orion.Nodes/NodeID=8",
            "IPAddress": "fe80::1"
        })))
        .unwrap();
        assert_eq!(node.octet(2), "");
        assert_eq!(node.octet(0), "");
        assert_eq!(node.octet(5), "");
    }

    #[test]
    fn test_row_without_uri_is_rejected() {
        let err = NodeRecord::from_row(&row(json!({"Caption": "orphan"}))).unwrap_err();
        assert_eq!(err.kind(), "query");
    }

    #[test]
    fn test_empty_patch_is_never_built() {
        assert!(UpdatePatch::new("swis://x", "x", PropertyMap::new()).is_none());

        let mut props = PropertyMap::new();
        props.insert("Environment".into(), "Dream".into());
        let patch = UpdatePatch::new("swis://x", "x", props).unwrap();
        assert_eq!(patch.properties().len(), 1);
    }

    #[test]
    fn test_derived_field_names() {
        assert_eq!(DerivedField::DeviceType.property(), "Device_Type");
        assert!(DerivedField::is_derived("device_function"));
        assert!(!DerivedField::is_derived("Site"));
    }
}
