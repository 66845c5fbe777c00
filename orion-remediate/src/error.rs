use thiserror::Error;

/// Errors raised while talking to an Orion server or loading local settings.
///
/// Connection and query errors are scoped to one server, write errors to one
/// node. Callers log them with that context and move on to the next unit.
#[derive(Debug, Error)]
pub enum OrionError {
    #[error("connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },
    #[error("query failed: {0}")]
    Query(String),
    #[error("write to {uri} failed: {reason}")]
    Write { uri: String, reason: String },
    #[error("invoke {entity}.{verb} failed: {reason}")]
    Invoke {
        entity: String,
        verb: String,
        reason: String,
    },
    #[error("invalid config: {0}")]
    Config(String),
    #[error("server list {path}: {source}")]
    ServerList {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OrionError {
    /// Short tag used in reports and log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            OrionError::Connection { .. } => "connection",
            OrionError::Query(_) => "query",
            OrionError::Write { .. } => "write",
            OrionError::Invoke { .. } => "invoke",
            OrionError::Config(_) => "config",
            OrionError::ServerList { .. } => "server_list",
            OrionError::Http(_) => "http",
            OrionError::Serialization(_) => "serialization",
        }
    }
}

pub type Result<T, E = OrionError> = std::result::Result<T, E>;
