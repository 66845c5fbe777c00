use serde::Serialize;
use tracing::{error, info};

use crate::inventory::Inventory;
use crate::models::UpdatePatch;

/// A patch that could not be written.
#[derive(Debug, Clone, Serialize)]
pub struct WriteFailure {
    pub uri: String,
    pub caption: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplySummary {
    pub applied: usize,
    pub failures: Vec<WriteFailure>,
}

/// Writes every patch once, in order. A failed write is recorded and the
/// next patch is still attempted. Nothing is retried or rolled back.
pub async fn apply_updates(inventory: &dyn Inventory, patches: Vec<UpdatePatch>) -> ApplySummary {
    let mut summary = ApplySummary::default();

    for patch in patches {
        let target = custom_properties_uri(patch.uri());
        match inventory.write(&target, patch.properties()).await {
            Ok(()) => {
                info!(host = inventory.host(), node = %patch.caption(), "updated");
                summary.applied += 1;
            }
            Err(e) => {
                error!(host = inventory.host(), node = %patch.caption(), "update failed: {e}");
                summary.failures.push(WriteFailure {
                    uri: patch.uri().to_string(),
                    caption: patch.caption().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    summary
}

/// Custom properties live on a child entity of the node.
pub fn custom_properties_uri(node_uri: &str) -> String {
    let trimmed = node_uri.trim_end_matches('/');
    if trimmed.ends_with("/CustomProperties") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/CustomProperties")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_properties_uri() {
        assert_eq!(
            custom_properties_uri("swis://orion/Orion/Orion.Nodes/NodeID=3"),
            "swis://orion/Orion/Orion.Nodes/NodeID=3/CustomProperties"
        );
        assert_eq!(
            custom_properties_uri("swis://orion/Orion/Orion.Nodes/NodeID=3/CustomProperties"),
            "swis://orion/Orion/Orion.Nodes/NodeID=3/CustomProperties"
        );
    }
}
