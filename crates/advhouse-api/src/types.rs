//! advcake API response types.
//!
//! ## Observed shape of `GET /orders/advertiser/{login}`
//!
//! ```json
//! { "total": 3, "data": [ { "order_id": "A-1", "created_at": "2024-03-01 10:15:00", ... } ] }
//! ```
//!
//! `total` is the number of records in this response, not across pages.
//! `data` is `null` or missing on some empty responses.
//!
//! Individual orders may carry `null` timestamps, status or commission.
//! Those fields are optional here; a kept order missing one is rejected
//! during enrichment, a filtered-out one is simply dropped.
//!
//! Several fields change JSON type between accounts (`order_id` and
//! `webmaster` arrive as strings for some logins and as numbers for others,
//! `price` may be an integer or a float). They are kept as raw
//! [`serde_json::Value`]s so the storage type can be inferred from the data.

use advhouse_core::ProjectConfig;
use serde::Deserialize;
use serde_json::Value;

/// One page of the orders endpoint.
#[derive(Debug, Deserialize)]
pub struct OrdersPage {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub data: Option<Vec<AdvertiserOrder>>,
}

impl OrdersPage {
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn into_orders(self) -> Vec<AdvertiserOrder> {
        self.data.unwrap_or_default()
    }
}

/// A single order as returned by the API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AdvertiserOrder {
    #[serde(default)]
    pub order_id: Value,
    /// `"YYYY-MM-DD HH:MM:SS"`.
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub partner: Value,
    #[serde(default)]
    pub webmaster: Value,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub commission: Value,
    /// Advertiser cost ratio computed by advcake. Not persisted.
    #[serde(default)]
    pub drr: Value,
}

/// All orders fetched for one configured project.
#[derive(Debug, Clone)]
pub struct ProjectOrders {
    pub project: ProjectConfig,
    pub orders: Vec<AdvertiserOrder>,
}
