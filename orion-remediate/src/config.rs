use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

pub const CONFIG_ENV: &str = "ORION_REMEDIATE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "orion.yaml";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct RemediateConfig {
    pub servers: Vec<String>,
    pub server_list: Option<PathBuf>,
    pub swis: SwisConf,
    pub dry_run: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SwisConf {
    pub port: u16,
    /// Orion ships with a self-signed certificate.
    pub accept_invalid_certs: bool,
    pub timeout_secs: u64,
}

impl Default for RemediateConfig {
    fn default() -> Self {
        Self {
            servers: Vec::new(),
            server_list: None,
            swis: SwisConf::default(),
            dry_run: false,
        }
    }
}

impl Default for SwisConf {
    fn default() -> Self {
        Self {
            port: 17774,
            accept_invalid_certs: true,
            timeout_secs: 30,
        }
    }
}

/// Loads the config from `$ORION_REMEDIATE_CONFIG` or `orion.yaml`.
pub async fn load_config() -> RemediateConfig {
    let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());
    load_config_from(&path).await
}

/// Missing or empty file gives the defaults; an invalid file is reported and
/// also gives the defaults.
pub async fn load_config_from(path: impl AsRef<Path>) -> RemediateConfig {
    let path = path.as_ref();
    if !path.exists() {
        warn!("no {}, using default config", path.display());
        return RemediateConfig::default();
    }

    let txt = fs::read_to_string(path).await.unwrap_or_default();
    if txt.trim().is_empty() {
        return RemediateConfig::default();
    }
    serde_yaml::from_str(&txt).unwrap_or_else(|e| {
        warn!("invalid config {}: {e}", path.display());
        RemediateConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_gives_defaults() {
        let cfg = load_config_from("/nonexistent/orion.yaml").await;
        assert_eq!(cfg, RemediateConfig::default());
        assert_eq!(cfg.swis.port, 17774);
        assert!(cfg.swis.accept_invalid_certs);
    }

    #[tokio::test]
    async fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "servers:\n  - orion-ship1\n  - orion-ship2\nswis:\n  port: 443\ndry_run: true").unwrap();

        let cfg = load_config_from(file.path()).await;
        assert_eq!(cfg.servers, vec!["orion-ship1", "orion-ship2"]);
        assert_eq!(cfg.swis.port, 443);
        assert_eq!(cfg.swis.timeout_secs, 30);
        assert!(cfg.dry_run);
    }

    #[tokio::test]
    async fn test_invalid_yaml_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "servers: [unterminated").unwrap();
        assert_eq!(load_config_from(file.path()).await, RemediateConfig::default());
    }
}
