// SPDX-FileCopyrightText: 2026 Truthlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `truthlens doctor` command implementation.
//!
//! Runs diagnostic checks against the local environment: configuration,
//! the SQLite store, reachability of the detection service, and history
//! left on this device by other accounts. Never modifies stored state.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use truthlens_app::{HistoryCache, TOKEN_KEY};
use truthlens_client::DetectorClient;
use truthlens_config::TruthlensConfig;
use truthlens_core::{
    AccessToken, DetectorApi, HealthStatus, HistoryKey, KeyValueStore, PluginAdapter,
    TruthlensError,
};
use truthlens_storage::SqliteStore;

/// Status of a diagnostic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

/// Result of a single diagnostic check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `truthlens doctor` command.
pub async fn run_doctor(
    config: &TruthlensConfig,
    config_path: Option<&Path>,
    plain: bool,
) -> Result<(), TruthlensError> {
    let use_color = !plain && std::io::stdout().is_terminal();

    let client = DetectorClient::new(&config.api, &config.security);
    let results = vec![
        check_config(config_path),
        check_database(&config.storage.database_path).await,
        check_service(&client).await,
        check_device_history(&config.storage.database_path, client.as_ref().ok()).await,
    ];

    println!();
    println!("  truthlens doctor");
    println!("  {}", "-".repeat(50));

    let mut issues = 0;
    for result in &results {
        if result.status != CheckStatus::Pass {
            issues += 1;
        }
        println!("{}", format_check(result, use_color));
    }

    println!();
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    Ok(())
}

fn format_check(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<20} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<20} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}

/// Check configuration loads and validates.
fn check_config(config_path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let loaded = match config_path {
        Some(path) => truthlens_config::load_and_validate_path(path),
        None => truthlens_config::load_and_validate(),
    };
    match loaded {
        Ok(_) => CheckResult::new("Configuration", CheckStatus::Pass, "valid", start),
        Err(errors) => CheckResult::new(
            "Configuration",
            CheckStatus::Fail,
            format!("{} error(s)", errors.len()),
            start,
        ),
    }
}

/// Check the local store exists and answers queries.
async fn check_database(db_path: &str) -> CheckResult {
    let start = Instant::now();
    if !Path::new(db_path).exists() {
        return CheckResult::new(
            "Local storage",
            CheckStatus::Warn,
            format!("not found: {db_path} (will be created on first use)"),
            start,
        );
    }

    let store = SqliteStore::at_path(db_path);
    let result = match store.health_check().await {
        Ok(HealthStatus::Healthy) => {
            CheckResult::new("Local storage", CheckStatus::Pass, "connected", start)
        }
        Ok(HealthStatus::Degraded(message)) => {
            CheckResult::new("Local storage", CheckStatus::Warn, message, start)
        }
        Ok(HealthStatus::Unhealthy(message)) => {
            CheckResult::new("Local storage", CheckStatus::Fail, message, start)
        }
        Err(e) => CheckResult::new("Local storage", CheckStatus::Fail, e.to_string(), start),
    };
    let _ = store.shutdown().await;
    result
}

/// Check the detection service is reachable under the transport policy.
async fn check_service(client: &Result<DetectorClient, TruthlensError>) -> CheckResult {
    let start = Instant::now();
    let client = match client {
        Ok(client) => client,
        Err(e) => {
            return CheckResult::new("Detection service", CheckStatus::Fail, e.to_string(), start);
        }
    };

    match client.health_check().await {
        Ok(HealthStatus::Healthy) => CheckResult::new(
            "Detection service",
            CheckStatus::Pass,
            format!("reachable at {}", client.base_url()),
            start,
        ),
        Ok(HealthStatus::Degraded(message)) => {
            CheckResult::new("Detection service", CheckStatus::Warn, message, start)
        }
        Ok(HealthStatus::Unhealthy(message)) => {
            CheckResult::new("Detection service", CheckStatus::Fail, message, start)
        }
        Err(e) => CheckResult::new("Detection service", CheckStatus::Fail, e.to_string(), start),
    }
}

/// Flag history stored on this device for accounts other than the signed-in one.
async fn check_device_history(db_path: &str, client: Option<&DetectorClient>) -> CheckResult {
    let start = Instant::now();
    if !Path::new(db_path).exists() {
        return CheckResult::new("Device history", CheckStatus::Pass, "no local data", start);
    }

    let store = Arc::new(SqliteStore::at_path(db_path));
    let current = match (store.get(TOKEN_KEY).await, client) {
        (Ok(Some(token)), Some(client)) => client
            .current_user(&AccessToken::new(token))
            .await
            .ok()
            .map(|user| user.history_key()),
        _ => None,
    };

    let cache = HistoryCache::new(Arc::clone(&store) as Arc<dyn KeyValueStore>);
    let result = match cache.stale_keys(current.as_ref()).await {
        Ok(stale) => stale_history_result(&stale, current.as_ref(), start),
        Err(e) => CheckResult::new("Device history", CheckStatus::Fail, e.to_string(), start),
    };
    let _ = store.shutdown().await;
    result
}

fn stale_history_result(
    stale: &[String],
    current: Option<&HistoryKey>,
    start: Instant,
) -> CheckResult {
    match (stale.len(), current) {
        (0, _) => CheckResult::new(
            "Device history",
            CheckStatus::Pass,
            "no history from other accounts",
            start,
        ),
        (n, Some(_)) => CheckResult::new(
            "Device history",
            CheckStatus::Warn,
            format!("{n} other account(s) have history stored on this device"),
            start,
        ),
        (n, None) => CheckResult::new(
            "Device history",
            CheckStatus::Warn,
            format!("{n} account(s) have history stored on this device while signed out"),
            start,
        ),
    }
}
