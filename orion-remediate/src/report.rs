use serde::Serialize;
use std::path::Path;
use time::OffsetDateTime;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::applier::{ApplySummary, WriteFailure};
use crate::error::OrionError;
use crate::models::UpdatePatch;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ServerStatus {
    Completed,
    Failed { kind: String, error: String },
}

/// Outcome of the remediation on one server.
#[derive(Debug, Clone, Serialize)]
pub struct ServerReport {
    pub host: String,
    #[serde(flatten)]
    pub status: ServerStatus,
    pub nodes_scanned: usize,
    /// Patches built by the diff. Written unless the run is a dry run.
    pub patches: Vec<UpdatePatch>,
    pub applied: usize,
    pub failures: Vec<WriteFailure>,
}

impl ServerReport {
    pub fn failed(host: &str, err: &OrionError) -> Self {
        Self {
            host: host.to_string(),
            status: ServerStatus::Failed {
                kind: err.kind().to_string(),
                error: err.to_string(),
            },
            nodes_scanned: 0,
            patches: Vec::new(),
            applied: 0,
            failures: Vec::new(),
        }
    }

    pub fn completed(host: &str, nodes_scanned: usize, patches: Vec<UpdatePatch>, applied: ApplySummary) -> Self {
        Self {
            host: host.to_string(),
            status: ServerStatus::Completed,
            nodes_scanned,
            patches,
            applied: applied.applied,
            failures: applied.failures,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.status == ServerStatus::Completed && self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finished_at: Option<OffsetDateTime>,
    pub dry_run: bool,
    pub servers: Vec<ServerReport>,
}

impl RunReport {
    pub fn begin(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: OffsetDateTime::now_utc(),
            finished_at: None,
            dry_run,
            servers: Vec::new(),
        }
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(OffsetDateTime::now_utc());
    }

    pub fn has_failures(&self) -> bool {
        self.servers.iter().any(|s| !s.is_clean())
    }

    pub fn total_applied(&self) -> usize {
        self.servers.iter().map(|s| s.applied).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.servers.iter().map(|s| s.failures.len()).sum()
    }

    /// Final summary, one line per server.
    pub fn log_summary(&self) {
        for server in &self.servers {
            match &server.status {
                ServerStatus::Completed if self.dry_run => info!(
                    "[{}] {} nodes, {} pending updates (dry run)",
                    server.host,
                    server.nodes_scanned,
                    server.patches.len()
                ),
                ServerStatus::Completed => info!(
                    "[{}] {} nodes, {} updated, {} failed",
                    server.host,
                    server.nodes_scanned,
                    server.applied,
                    server.failures.len()
                ),
                ServerStatus::Failed { kind, error } => error!("[{}] skipped ({kind}): {error}", server.host),
            }
            for failure in &server.failures {
                warn!("[{}]   {} ({}): {}", server.host, failure.caption, failure.uri, failure.error);
            }
        }
        info!(
            run_id = %self.run_id,
            "{} servers, {} updated, {} failed",
            self.servers.len(),
            self.total_applied(),
            self.total_failed()
        );
    }

    pub async fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
