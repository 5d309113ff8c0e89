// SPDX-FileCopyrightText: 2026 Lockbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `lockbox status` command implementation.
//!
//! Connects to the running server's health endpoint to display state and
//! uptime, plus whether first-run setup has happened. Falls back
//! gracefully when the server is not running.

use std::io::IsTerminal;
use std::time::Duration;

use colored::Colorize;
use lockbox_config::model::LockboxConfig;
use lockbox_core::LockboxError;
use serde::{Deserialize, Serialize};

/// Health endpoint response from the gateway.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

/// Setup-check endpoint response from the gateway.
#[derive(Debug, Deserialize)]
struct CheckResponse {
    setup_complete: bool,
}

/// Structured status output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub running: bool,
    pub status: String,
    pub version: Option<String>,
    pub uptime_secs: Option<u64>,
    pub setup_complete: Option<bool>,
    pub host: String,
    pub port: u16,
}

/// Format seconds into a human-readable duration string.
fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{days}d {hours}h {minutes}m")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Run the `lockbox status` command.
pub async fn run_status(config: &LockboxConfig, json: bool) -> Result<(), LockboxError> {
    let host = &config.server.host;
    let port = config.server.port;
    let base = format!("http://{host}:{port}");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .map_err(|e| LockboxError::Internal(format!("failed to build HTTP client: {e}")))?;

    let health: Option<HealthResponse> = match client.get(format!("{base}/health")).send().await {
        Ok(response) => response.json().await.ok(),
        Err(_) => None,
    };
    let check: Option<CheckResponse> = match client.get(format!("{base}/v1/auth/check")).send().await
    {
        Ok(response) => response.json().await.ok(),
        Err(_) => None,
    };

    let status = StatusResponse {
        running: health.is_some(),
        status: health
            .as_ref()
            .map(|h| h.status.clone())
            .unwrap_or_else(|| "stopped".to_string()),
        version: health.as_ref().map(|h| h.version.clone()),
        uptime_secs: health.as_ref().map(|h| h.uptime_secs),
        setup_complete: check.map(|c| c.setup_complete),
        host: host.clone(),
        port,
    };

    if json {
        let out = serde_json::to_string_pretty(&status)
            .map_err(|e| LockboxError::Internal(format!("failed to serialize status: {e}")))?;
        println!("{out}");
        return Ok(());
    }

    let color = std::io::stdout().is_terminal();
    if status.running {
        let label = if color { "running".green().to_string() } else { "running".to_string() };
        println!("lockbox: {label} at {base}");
        if let Some(version) = &status.version {
            println!("  version: {version}");
        }
        if let Some(uptime) = status.uptime_secs {
            println!("  uptime:  {}", format_uptime(uptime));
        }
        match status.setup_complete {
            Some(true) => println!("  vault:   master password set"),
            Some(false) => println!("  vault:   not set up -- run `lockbox setup`"),
            None => {}
        }
    } else {
        let label = if color { "stopped".red().to_string() } else { "stopped".to_string() };
        println!("lockbox: {label} (no server at {base})");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(3600), "1h 0m");
        assert_eq!(format_uptime(90061), "1d 1h 1m");
    }
}
