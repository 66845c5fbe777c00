//! Target server list: config hosts, then the server list file, then hosts
//! given on the command line. First occurrence wins.

use std::path::Path;

use crate::error::OrionError;

/// Parses a server list file body: one host per line, `#` starts a comment.
pub fn parse_server_list(text: &str) -> Vec<String> {
    text.lines()
        .map(|line| line.split('#').next().unwrap_or("").trim())
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub async fn read_server_list(path: &Path) -> Result<Vec<String>, OrionError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| OrionError::ServerList {
            path: path.display().to_string(),
            source,
        })?;
    Ok(parse_server_list(&text))
}

/// Concatenates the sources, trimming and dropping duplicates
/// (case-insensitive, host names).
pub fn merge_servers<'a, I>(sources: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a [String]>,
{
    let mut merged: Vec<String> = Vec::new();
    for source in sources {
        for host in source {
            let host = host.trim();
            if host.is_empty() || merged.iter().any(|h| h.eq_ignore_ascii_case(host)) {
                continue;
            }
            merged.push(host.to_string());
        }
    }
    merged
}
