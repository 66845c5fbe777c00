/*!
Mock Orion inventory for tests without a SWIS server

Serves canned rows, records every query, write and invoke, and can be told
to fail on specific calls.
*/

use async_trait::async_trait;
use orion_remediate::{Connector, Inventory, OrionError, PropertyMap, Row};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedWrite {
    pub uri: String,
    pub properties: PropertyMap,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInvoke {
    pub entity: String,
    pub verb: String,
    pub args: Vec<Value>,
}

#[derive(Default)]
struct State {
    custom_fields: Vec<String>,
    nodes: Vec<Row>,
    queries: Vec<String>,
    writes: Vec<RecordedWrite>,
    invokes: Vec<RecordedInvoke>,
    failing_writes: HashSet<String>,
    fail_queries: bool,
}

/// In-memory `Inventory`. Clones share state, so a test can keep a handle
/// while the code under test owns another.
#[derive(Clone)]
pub struct MockInventory {
    host: String,
    state: Arc<Mutex<State>>,
}

impl MockInventory {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Custom property field names returned by the field discovery query.
    pub fn with_custom_fields<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.lock().custom_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_nodes(self, nodes: Vec<Row>) -> Self {
        self.state.lock().nodes = nodes;
        self
    }

    /// Writes whose target starts with `node_uri` fail.
    pub fn fail_writes_for(self, node_uri: impl Into<String>) -> Self {
        self.state.lock().failing_writes.insert(node_uri.into());
        self
    }

    pub fn fail_queries(self) -> Self {
        self.state.lock().fail_queries = true;
        self
    }

    pub fn queries(&self) -> Vec<String> {
        self.state.lock().queries.clone()
    }

    pub fn writes(&self) -> Vec<RecordedWrite> {
        self.state.lock().writes.clone()
    }

    pub fn invokes(&self) -> Vec<RecordedInvoke> {
        self.state.lock().invokes.clone()
    }
}

#[async_trait]
impl Inventory for MockInventory {
    fn host(&self) -> &str {
        &self.host
    }

    async fn query(&self, swql: &str) -> Result<Vec<Row>, OrionError> {
        let mut state = self.state.lock();
        state.queries.push(swql.to_string());
        log::info!("[MOCK {}] query: {}", self.host, swql);

        if state.fail_queries {
            return Err(OrionError::Query("mock query failure".into()));
        }

        if swql.contains("FROM Orion.CustomProperty") {
            return Ok(state
                .custom_fields
                .iter()
                .map(|f| {
                    let mut row = Row::new();
                    row.insert("Field".into(), Value::String(f.clone()));
                    row.insert("DataType".into(), Value::String("nvarchar".into()));
                    row.insert("MaxLength".into(), Value::from(4000));
                    row.insert("Description".into(), Value::String(String::new()));
                    row
                })
                .collect());
        }
        if swql.contains("FROM Orion.Nodes") {
            return Ok(state.nodes.clone());
        }
        Ok(Vec::new())
    }

    async fn write(&self, uri: &str, properties: &PropertyMap) -> Result<(), OrionError> {
        let mut state = self.state.lock();
        if state.failing_writes.iter().any(|f| uri.starts_with(f.as_str())) {
            log::warn!("[MOCK {}] write refused: {}", self.host, uri);
            return Err(OrionError::Write {
                uri: uri.to_string(),
                reason: "mock write failure".into(),
            });
        }
        state.writes.push(RecordedWrite {
            uri: uri.to_string(),
            properties: properties.clone(),
        });
        log::info!("[MOCK {}] write: {} {:?}", self.host, uri, properties);
        Ok(())
    }

    async fn invoke(&self, entity: &str, verb: &str, args: Vec<Value>) -> Result<Value, OrionError> {
        self.state.lock().invokes.push(RecordedInvoke {
            entity: entity.to_string(),
            verb: verb.to_string(),
            args,
        });
        Ok(Value::Null)
    }
}

/// `Connector` over a fixed set of mock servers. Unknown hosts and hosts
/// marked unreachable fail to connect.
#[derive(Clone, Default)]
pub struct MockConnector {
    servers: HashMap<String, MockInventory>,
    unreachable: HashSet<String>,
    attempts: Arc<Mutex<Vec<String>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(mut self, inventory: MockInventory) -> Self {
        self.servers.insert(inventory.host.clone(), inventory);
        self
    }

    pub fn unreachable(mut self, host: impl Into<String>) -> Self {
        self.unreachable.insert(host.into());
        self
    }

    /// Hosts passed to `connect`, in call order.
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().clone()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, host: &str) -> Result<Box<dyn Inventory>, OrionError> {
        self.attempts.lock().push(host.to_string());
        let refused = || OrionError::Connection {
            host: host.to_string(),
            reason: "mock connection refused".into(),
        };
        if self.unreachable.contains(host) {
            return Err(refused());
        }
        let inventory = self.servers.get(host).cloned().ok_or_else(refused)?;
        Ok(Box::new(inventory))
    }
}
