//! ClickHouse provisioning and bulk loading over the HTTP interface.

pub mod client;
pub mod ddl;
pub mod load;

use advhouse_core::AppConfig;
use thiserror::Error;

pub use client::ClickHouseClient;
pub use ddl::{create_table_sql, provision_table};
pub use load::{encode_row, insert_columns, insert_sql, load_rows};

const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Clone)]
pub struct ClickHouseConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub timeout_secs: u64,
}

impl ClickHouseConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            url: config.clickhouse_url.clone(),
            user: config.clickhouse_user.clone(),
            password: config.clickhouse_password.clone(),
            database: config.clickhouse_database.clone(),
            timeout_secs: DEFAULT_TIMEOUT_SECS.max(config.request_timeout_secs),
        }
    }
}

impl std::fmt::Debug for ClickHouseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"[redacted]")
            .field("database", &self.database)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid ClickHouse URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// ClickHouse answered with a non-2xx status; `message` is its error text.
    #[error("ClickHouse returned HTTP {status}: {message}")]
    Server { status: u16, message: String },

    #[error("column '{0}' is not part of the table schema")]
    MissingColumn(String),

    #[error("failed to encode rows: {0}")]
    Encode(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_password() {
        let config = ClickHouseConfig {
            url: "http://localhost:8123".into(),
            user: "default".into(),
            password: "hunter2".into(),
            database: "advcake".into(),
            timeout_secs: 30,
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("advcake"));
    }
}
