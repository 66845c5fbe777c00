//! Derives the classification custom properties from raw node attributes.
//!
//! Every function here is pure: it reads the record and the static tables in
//! [`crate::rules`] and returns `None` when no rule applies. Deciding what to
//! do with `None` belongs to the diff builder.

use crate::models::{DerivedField, NodeRecord};
use crate::rules::{self, KeywordRule, Source};

/// Environment from the exact value of the second IP octet.
pub fn derive_environment(node: &NodeRecord) -> Option<&'static str> {
    rules::environment_for(node.octet(2))
}

/// Device_Type from MachineType then Caption rules, last match wins.
pub fn derive_device_type(node: &NodeRecord) -> Option<&'static str> {
    last_match(rules::DEVICE_TYPE_RULES, node)
}

/// Device_Function from Caption rules, last match wins.
pub fn derive_device_function(node: &NodeRecord) -> Option<&'static str> {
    last_match(rules::DEVICE_FUNCTION_RULES, node)
}

pub fn derive(field: DerivedField, node: &NodeRecord) -> Option<&'static str> {
    match field {
        DerivedField::Environment => derive_environment(node),
        DerivedField::DeviceType => derive_device_type(node),
        DerivedField::DeviceFunction => derive_device_function(node),
    }
}

fn last_match(table: &[KeywordRule], node: &NodeRecord) -> Option<&'static str> {
    let mut label = None;
    for rule in table {
        if matches(rule, node) {
            label = Some(rule.label);
        }
    }
    label
}

fn matches(rule: &KeywordRule, node: &NodeRecord) -> bool {
    if !source_text(rule.source, node).contains(rule.keyword) {
        return false;
    }
    match rule.unless {
        Some((source, keyword)) => !source_text(source, node).contains(keyword),
        None => true,
    }
}

fn source_text(source: Source, node: &NodeRecord) -> &str {
    match source {
        Source::MachineType => node.machine_type.as_deref().unwrap_or(""),
        Source::Caption => &node.caption,
    }
}
