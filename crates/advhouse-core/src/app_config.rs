use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

/// Storage layout of the destination table.
///
/// These are properties of the table itself rather than of the deployment,
/// so they are not read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLayout {
    /// Version column used by `ReplacingMergeTree` to pick the surviving row.
    pub update_field: String,
    /// Columns forming the deduplication key.
    pub unique_fields: Vec<String>,
    /// Column written first on insert.
    pub index_field: String,
    pub index_granularity: u32,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self {
            update_field: "last_updated_at".to_string(),
            unique_fields: vec!["order_id".to_string(), "created_at".to_string()],
            index_field: "project".to_string(),
            index_granularity: 8192,
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub api_base_url: String,
    pub lookback_days: u64,
    pub request_timeout_secs: u64,
    pub projects_path: PathBuf,
    pub log_level: String,
    pub clickhouse_url: String,
    pub clickhouse_user: String,
    pub clickhouse_password: String,
    pub clickhouse_database: String,
    pub clickhouse_table: String,
    pub status_allow: Vec<String>,
    pub excluded_project: Option<String>,
    pub agency_multiplier: Decimal,
    pub extra_multiplier: Decimal,
    pub insert_batch_size: usize,
    pub layout: TableLayout,
}

impl AppConfig {
    /// First day of the lookback window, counted back from `today`.
    #[must_use]
    pub fn date_from(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(self.lookback_days))
            .unwrap_or(NaiveDate::MIN)
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("lookback_days", &self.lookback_days)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("projects_path", &self.projects_path)
            .field("log_level", &self.log_level)
            .field("clickhouse_url", &self.clickhouse_url)
            .field("clickhouse_user", &self.clickhouse_user)
            .field("clickhouse_password", &"[redacted]")
            .field("clickhouse_database", &self.clickhouse_database)
            .field("clickhouse_table", &self.clickhouse_table)
            .field("status_allow", &self.status_allow)
            .field("excluded_project", &self.excluded_project)
            .field("agency_multiplier", &self.agency_multiplier)
            .field("extra_multiplier", &self.extra_multiplier)
            .field("insert_batch_size", &self.insert_batch_size)
            .field("layout", &self.layout)
            .finish()
    }
}
