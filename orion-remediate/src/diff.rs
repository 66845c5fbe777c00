//! Builds the sparse update list from classified nodes.
//!
//! A field that the classifier leaves unmapped keeps its stored value. A
//! stored null and a stored empty string are the same "unset" state.

use tracing::{debug, info};

use crate::classifier;
use crate::models::{DerivedField, NodeRecord, PropertyMap, UpdatePatch};

/// Recomputes the derived fields of `node` in place and returns the changed
/// properties, or `None` if nothing changed.
pub fn classify_node(node: &mut NodeRecord) -> Option<UpdatePatch> {
    let mut properties = PropertyMap::new();

    for field in DerivedField::ALL {
        let old = normalized(node.derived(field));
        let new = match classifier::derive(field, node) {
            Some(label) => Some(label.to_string()),
            None => old.map(str::to_string),
        };

        if old != new.as_deref() {
            if let Some(value) = &new {
                properties.insert(field.property().to_string(), value.clone());
            }
        }
        node.set_derived(field, new);
    }

    UpdatePatch::new(node.uri.clone(), node.caption.clone(), properties)
}

/// One patch per changed node, in input order.
pub fn build_update_list(nodes: &mut [NodeRecord]) -> Vec<UpdatePatch> {
    let mut patches = Vec::with_capacity(nodes.len());

    for node in nodes.iter_mut() {
        match classify_node(node) {
            Some(patch) => {
                info!(node = %patch.caption(), changes = ?patch.properties(), "node changed");
                patches.push(patch);
            }
            None => debug!(node = %node.caption, "node unchanged"),
        }
    }

    patches
}

fn normalized(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
