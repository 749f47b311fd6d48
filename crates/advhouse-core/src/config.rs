use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::app_config::{AppConfig, TableLayout};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        Ok(value)
    };

    let parse_multiplier = |var: &str, default: &str| -> Result<Decimal, ConfigError> {
        let raw = or_default(var, default);
        let value = Decimal::from_str(raw.trim()).map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })?;
        if value <= Decimal::ZERO {
            return Err(ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: "must be positive".to_string(),
            });
        }
        Ok(value)
    };

    let api_key = require("ADVCAKE_API_KEY")?;
    let api_base_url = or_default("ADVCAKE_BASE_URL", "https://api.advcake.com");
    let lookback_days = parse_u64("ADVHOUSE_LOOKBACK_DAYS", "180")?;
    let request_timeout_secs = parse_u64("ADVHOUSE_REQUEST_TIMEOUT_SECS", "60")?;
    let projects_path = PathBuf::from(or_default(
        "ADVHOUSE_PROJECTS_PATH",
        "./config/projects.yaml",
    ));
    let log_level = or_default("ADVHOUSE_LOG_LEVEL", "info");

    let clickhouse_url = or_default("CLICKHOUSE_URL", "http://localhost:8123");
    let clickhouse_user = or_default("CLICKHOUSE_USER", "default");
    let clickhouse_password = or_default("CLICKHOUSE_PASSWORD", "");
    let clickhouse_database = or_default("CLICKHOUSE_DATABASE", "advcake");
    let clickhouse_table = or_default("CLICKHOUSE_TABLE", "commission");

    let status_allow = parse_list(&or_default("ADVHOUSE_STATUS_ALLOW", "New,Approved"));
    if status_allow.is_empty() {
        return Err(ConfigError::InvalidEnvVar {
            var: "ADVHOUSE_STATUS_ALLOW".to_string(),
            reason: "at least one status is required".to_string(),
        });
    }
    let excluded_project = lookup("ADVHOUSE_EXCLUDED_PROJECT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let agency_multiplier = parse_multiplier("ADVHOUSE_AGENCY_MULTIPLIER", "1.12")?;
    let extra_multiplier = parse_multiplier("ADVHOUSE_EXTRA_MULTIPLIER", "1.12")?;
    let insert_batch_size = parse_usize("ADVHOUSE_INSERT_BATCH_SIZE", "100000")?;

    Ok(AppConfig {
        api_key,
        api_base_url,
        lookback_days,
        request_timeout_secs,
        projects_path,
        log_level,
        clickhouse_url,
        clickhouse_user,
        clickhouse_password,
        clickhouse_database,
        clickhouse_table,
        status_allow,
        excluded_project,
        agency_multiplier,
        extra_multiplier,
        insert_batch_size,
        layout: TableLayout::default(),
    })
}

/// Splits a comma-separated list, dropping blank entries.
fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
