//! Cleaning and enrichment of fetched orders into storage rows.

use advhouse_api::{AdvertiserOrder, ProjectOrders};
use advhouse_core::AppConfig;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::cell::{parse_decimal, Cell};
use crate::error::TransformError;

/// Storage column order. Every row is emitted in exactly this order.
pub const COLUMNS: [&str; 12] = [
    "project",
    "store_name",
    "order_id",
    "created_at",
    "updated_at",
    "status",
    "partner",
    "webmaster",
    "price",
    "commission",
    "final_commission",
    "last_updated_at",
];

/// Business rules applied while enriching.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentRules {
    /// Orders whose status is not listed here are dropped.
    pub status_allow: Vec<String>,
    /// Project (display name) that only pays the agency fee.
    pub excluded_project: Option<String>,
    pub agency_multiplier: Decimal,
    pub extra_multiplier: Decimal,
}

impl EnrichmentRules {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            status_allow: config.status_allow.clone(),
            excluded_project: config.excluded_project.clone(),
            agency_multiplier: config.agency_multiplier,
            extra_multiplier: config.extra_multiplier,
        }
    }

    /// A missing status is never allowed.
    fn allows(&self, status: Option<&str>) -> bool {
        status.is_some_and(|status| self.status_allow.iter().any(|s| s == status))
    }
}

/// An order ready for storage.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedOrder {
    pub project: String,
    pub store_name: String,
    pub order_id: Cell,
    pub created_at: NaiveDate,
    pub updated_at: NaiveDate,
    pub status: String,
    pub partner: Cell,
    pub webmaster: Cell,
    pub price: Cell,
    pub commission: Decimal,
    pub final_commission: Decimal,
    pub last_updated_at: NaiveDate,
}

impl EnrichedOrder {
    /// Row values in [`COLUMNS`] order.
    #[must_use]
    pub fn cells(&self) -> [Cell; 12] {
        [
            Cell::Text(self.project.clone()),
            Cell::Text(self.store_name.clone()),
            self.order_id.clone(),
            Cell::Date(self.created_at),
            Cell::Date(self.updated_at),
            Cell::Text(self.status.clone()),
            self.partner.clone(),
            self.webmaster.clone(),
            self.price.clone(),
            Cell::Float(self.commission),
            Cell::Float(self.final_commission),
            Cell::Date(self.last_updated_at),
        ]
    }
}

/// Commission owed including fees: `commission × agency`, times `extra` as
/// well unless `project` is the excluded one. Rounded half-to-even to cents.
///
/// Returns `None` if the product overflows [`Decimal`].
#[must_use]
pub fn final_commission(
    commission: Decimal,
    project: &str,
    rules: &EnrichmentRules,
) -> Option<Decimal> {
    let mut value = commission.checked_mul(rules.agency_multiplier)?;
    if rules.excluded_project.as_deref() != Some(project) {
        value = value.checked_mul(rules.extra_multiplier)?;
    }
    Some(value.round_dp(2))
}

/// Filters, stamps and enriches every fetched order.
///
/// `run_at` is the single run timestamp written to `last_updated_at` on
/// every row. Orders with a status outside the allow-set are dropped
/// before any parsing, so malformed rejected rows never fail the run.
///
/// # Errors
///
/// - [`TransformError::InvalidTimestamp`] if a kept order has a missing or
///   unparseable `created_at` or `updated_at`.
/// - [`TransformError::InvalidNumber`] if a kept order has a missing or
///   non-numeric commission, or a number out of range.
pub fn enrich(
    batches: &[ProjectOrders],
    rules: &EnrichmentRules,
    run_at: NaiveDateTime,
) -> Result<Vec<EnrichedOrder>, TransformError> {
    let last_updated_at = run_at.date();
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for batch in batches {
        for order in &batch.orders {
            if !rules.allows(order.status.as_deref()) {
                dropped += 1;
                continue;
            }
            rows.push(enrich_order(
                order,
                &batch.project.project,
                &batch.project.store_name,
                rules,
                last_updated_at,
            )?);
        }
    }

    tracing::info!(kept = rows.len(), dropped, "enriched orders");
    Ok(rows)
}

fn enrich_order(
    order: &AdvertiserOrder,
    project: &str,
    store_name: &str,
    rules: &EnrichmentRules,
    last_updated_at: NaiveDate,
) -> Result<EnrichedOrder, TransformError> {
    let order_id = json_cell("order_id", &order.order_id, &order.order_id)?;
    let created_at = parse_order_date("created_at", order.created_at.as_deref(), &order_id)?;
    let updated_at = parse_order_date("updated_at", order.updated_at.as_deref(), &order_id)?;
    let commission = parse_commission(&order.commission, &order_id)?;
    let final_commission = final_commission(commission, project, rules).ok_or_else(|| {
        TransformError::InvalidNumber {
            column: "final_commission",
            order_id: order_id.to_string(),
            value: commission.to_string(),
        }
    })?;

    Ok(EnrichedOrder {
        project: project.to_owned(),
        store_name: store_name.to_owned(),
        created_at,
        updated_at,
        status: order.status.clone().unwrap_or_default(),
        partner: json_cell("partner", &order.partner, &order.order_id)?,
        webmaster: json_cell("webmaster", &order.webmaster, &order.order_id)?,
        price: json_cell("price", &order.price, &order.order_id)?,
        commission,
        final_commission,
        last_updated_at,
        order_id,
    })
}

fn json_cell(
    column: &'static str,
    value: &Value,
    order_id: &Value,
) -> Result<Cell, TransformError> {
    Cell::from_json(value).ok_or_else(|| TransformError::InvalidNumber {
        column,
        order_id: order_id.to_string(),
        value: value.to_string(),
    })
}

/// Truncates an API timestamp to its calendar date.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` and bare `YYYY-MM-DD`.
fn parse_order_date(
    column: &'static str,
    raw: Option<&str>,
    order_id: &Cell,
) -> Result<NaiveDate, TransformError> {
    let invalid = || TransformError::InvalidTimestamp {
        column,
        order_id: order_id.to_string(),
        value: raw.unwrap_or("null").to_owned(),
    };
    let trimmed = raw.ok_or_else(invalid)?.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .map_err(|_| invalid())
}

/// Commission arrives as a JSON number, occasionally as a numeric string.
fn parse_commission(value: &Value, order_id: &Cell) -> Result<Decimal, TransformError> {
    let parsed = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s),
        _ => None,
    };
    parsed.ok_or_else(|| TransformError::InvalidNumber {
        column: "commission",
        order_id: order_id.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
#[path = "enrich_test.rs"]
mod tests;
