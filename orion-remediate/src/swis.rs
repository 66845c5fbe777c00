/**
 * SWIS CLIENT - SolarWinds Information Service REST client
 *
 * ROLE :
 * Production implementation of `Inventory` / `Connector` over the SWIS JSON
 * API (`https://{host}:17774/SolarWinds/InformationService/v3/Json/...`).
 *
 * ENDPOINTS :
 * - GET  Query?query={swql}            -> {"results": [..]}
 * - POST {uri}                         -> update entity properties
 * - POST Invoke/{entity}/{verb}        -> verb call, JSON array of args
 *
 * Basic auth on every request. Credentials are never logged.
 */

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::SwisConf;
use crate::error::OrionError;
use crate::inventory::{Connector, Inventory};
use crate::models::{PropertyMap, Row};

const PROBE_QUERY: &str = "SELECT TOP 1 Uri FROM Orion.Nodes";

#[derive(Debug, Deserialize)]
struct QueryResponse {
    results: Vec<Row>,
}

pub struct SwisClient {
    host: String,
    base_url: String,
    username: String,
    password: String,
    http: reqwest::Client,
}

impl SwisClient {
    /// Opens a session and checks it with a trivial query.
    pub async fn connect(host: &str, username: &str, password: &str, conf: &SwisConf) -> Result<Self, OrionError> {
        let connection_error = |reason: String| OrionError::Connection {
            host: host.to_string(),
            reason,
        };

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(conf.accept_invalid_certs)
            .timeout(Duration::from_secs(conf.timeout_secs))
            .user_agent(concat!("orion-remediate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| connection_error(e.to_string()))?;

        let client = Self {
            host: host.to_string(),
            base_url: base_url(host, conf.port),
            username: username.to_string(),
            password: password.to_string(),
            http,
        };

        client
            .query(PROBE_QUERY)
            .await
            .map_err(|e| connection_error(e.to_string()))?;

        info!(host, "connected to SWIS");
        Ok(client)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, String> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(format!("{status}: {}", body.trim()))
    }
}

pub fn base_url(host: &str, port: u16) -> String {
    format!("https://{host}:{port}/SolarWinds/InformationService/v3/Json")
}

#[async_trait]
impl Inventory for SwisClient {
    fn host(&self) -> &str {
        &self.host
    }

    async fn query(&self, swql: &str) -> Result<Vec<Row>, OrionError> {
        debug!(host = %self.host, swql, "query");
        let response = self
            .http
            .get(format!("{}/Query", self.base_url))
            .query(&[("query", swql)])
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let response = Self::check(response).await.map_err(OrionError::Query)?;
        let body: QueryResponse = response
            .json()
            .await
            .map_err(|e| OrionError::Query(format!("unexpected response: {e}")))?;
        Ok(body.results)
    }

    async fn write(&self, uri: &str, properties: &PropertyMap) -> Result<(), OrionError> {
        let write_error = |reason: String| OrionError::Write {
            uri: uri.to_string(),
            reason,
        };

        let response = self
            .http
            .post(format!("{}/{}", self.base_url, uri))
            .basic_auth(&self.username, Some(&self.password))
            .json(properties)
            .send()
            .await
            .map_err(|e| write_error(e.to_string()))?;

        Self::check(response).await.map_err(write_error)?;
        Ok(())
    }

    async fn invoke(&self, entity: &str, verb: &str, args: Vec<Value>) -> Result<Value, OrionError> {
        let invoke_error = |reason: String| OrionError::Invoke {
            entity: entity.to_string(),
            verb: verb.to_string(),
            reason,
        };

        let response = self
            .http
            .post(format!("{}/Invoke/{entity}/{verb}", self.base_url))
            .basic_auth(&self.username, Some(&self.password))
            .json(&args)
            .send()
            .await
            .map_err(|e| invoke_error(e.to_string()))?;

        let response = Self::check(response).await.map_err(invoke_error)?;
        let text = response.text().await.map_err(|e| invoke_error(e.to_string()))?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// Opens `SwisClient` sessions with one set of credentials.
pub struct SwisConnector {
    username: String,
    password: String,
    conf: SwisConf,
}

impl SwisConnector {
    pub fn new(username: impl Into<String>, password: impl Into<String>, conf: SwisConf) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            conf,
        }
    }
}

#[async_trait]
impl Connector for SwisConnector {
    async fn connect(&self, host: &str) -> Result<Box<dyn Inventory>, OrionError> {
        let client = SwisClient::connect(host, &self.username, &self.password, &self.conf).await?;
        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        assert_eq!(
            base_url("orion-dream", 17774),
            "https://orion-dream:17774/SolarWinds/InformationService/v3/Json"
        );
    }

    #[test]
    fn test_query_response_shape() {
        let body = r#"{"results":[{"Field":"Environment"},{"Field":"Site"}]}"#;
        let parsed: QueryResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[1]["Field"], "Site");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_connection_error() {
        let conf = SwisConf {
            port: 1,
            accept_invalid_certs: true,
            timeout_secs: 2,
        };
        let err = SwisClient::connect("127.0.0.1", "admin", "secret", &conf)
            .await
            .err()
            .unwrap();
        assert_eq!(err.kind(), "connection");
        assert!(!err.to_string().contains("secret"));
    }
}
