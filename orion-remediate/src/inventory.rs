/**
 * INVENTORY PORT - Seam between the remediation and an Orion server
 *
 * ROLE :
 * The core never talks HTTP directly. It goes through `Inventory` (one open
 * session on one server) and `Connector` (opens sessions). `SwisClient` is
 * the production implementation; the devkit provides in-memory mocks.
 */

use async_trait::async_trait;
use serde_json::Value;

use crate::error::OrionError;
use crate::models::{PropertyMap, Row};

/// One authenticated session on one Orion server.
#[async_trait]
pub trait Inventory: Send + Sync {
    /// Host name this session talks to, for logs and reports.
    fn host(&self) -> &str;

    /// Runs a SWQL query and returns its rows.
    async fn query(&self, swql: &str) -> Result<Vec<Row>, OrionError>;

    /// Updates properties of the entity at `uri` (for custom properties, the
    /// node's `/CustomProperties` child). All or nothing.
    async fn write(&self, uri: &str, properties: &PropertyMap) -> Result<(), OrionError>;

    /// Invokes a SWIS verb with positional arguments.
    async fn invoke(&self, entity: &str, verb: &str, args: Vec<Value>) -> Result<Value, OrionError>;
}

/// Opens sessions, one per server.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, host: &str) -> Result<Box<dyn Inventory>, OrionError>;
}
