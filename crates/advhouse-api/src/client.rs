//! HTTP client for the advcake advertiser orders API.
//!
//! The orders endpoint is offset-paginated with a fixed page size: a full
//! page means there may be more, a short (or empty) page is the last one.

use std::time::Duration;

use advhouse_core::ProjectConfig;
use chrono::NaiveDate;
use reqwest::{Client, Url};

use crate::error::ApiError;
use crate::types::{AdvertiserOrder, OrdersPage, ProjectOrders};

const DEFAULT_BASE_URL: &str = "https://api.advcake.com/";

/// Maximum number of rows the API returns per request.
pub const PAGE_SIZE: usize = 5000;

/// Maximum number of pages fetched per project before giving up.
/// Prevents an endless loop against an API that keeps returning full pages.
pub const MAX_PAGES: usize = 1000;

/// Client for the advcake orders API.
///
/// Use [`AdvcakeClient::new`] for production or
/// [`AdvcakeClient::with_base_url`] to point at a mock server in tests.
pub struct AdvcakeClient {
    client: Client,
    api_key: String,
    base_url: Url,
    max_pages: usize,
}

impl AdvcakeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        Self::with_base_url(api_key, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ApiError::InvalidBaseUrl`] if `base_url`
    /// is not an absolute http(s) URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("advhouse/0.1 (order-sync)")
            .build()
            .map_err(ApiError::http)?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ApiError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url: parsed,
            max_pages: MAX_PAGES,
        })
    }

    /// Overrides the per-project page cap.
    #[must_use]
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Fetches one page of orders for `login` starting at `offset`.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Http`] on network failure.
    /// - [`ApiError::UnexpectedStatus`] on a non-2xx response.
    /// - [`ApiError::Deserialize`] if the body does not match [`OrdersPage`].
    pub async fn fetch_orders_page(
        &self,
        login: &str,
        date_from: NaiveDate,
        offset: usize,
    ) -> Result<OrdersPage, ApiError> {
        let url = self.orders_url(login, date_from, offset)?;
        let response = self.client.get(url).send().await.map_err(ApiError::http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                login: login.to_owned(),
                offset,
            });
        }

        let body = response.text().await.map_err(ApiError::http)?;
        let page: OrdersPage =
            serde_json::from_str(&body).map_err(|e| ApiError::Deserialize {
                context: format!("orders(login={login}, offset={offset})"),
                source: e,
            })?;

        tracing::info!(
            login,
            offset,
            rows = page.len(),
            total = ?page.total,
            status = %status,
            "fetched orders page"
        );

        Ok(page)
    }

    /// Fetches every order for `login` created since `date_from`.
    ///
    /// Requests pages at offsets `0, PAGE_SIZE, 2 * PAGE_SIZE, ...` until a
    /// page comes back with fewer than [`PAGE_SIZE`] rows.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`Self::fetch_orders_page`]. Returns
    /// [`ApiError::PaginationLimit`] when more than `max_pages` pages would
    /// be needed.
    pub async fn fetch_all_orders(
        &self,
        login: &str,
        date_from: NaiveDate,
    ) -> Result<Vec<AdvertiserOrder>, ApiError> {
        let mut orders = Vec::new();
        let mut offset = 0usize;
        let mut page_count = 0usize;

        loop {
            page_count += 1;
            if page_count > self.max_pages {
                return Err(ApiError::PaginationLimit {
                    login: login.to_owned(),
                    max_pages: self.max_pages,
                });
            }

            let page = self.fetch_orders_page(login, date_from, offset).await?;
            let rows = page.len();
            orders.extend(page.into_orders());

            if rows < PAGE_SIZE {
                break;
            }
            offset += PAGE_SIZE;
        }

        Ok(orders)
    }

    /// Fetches orders for each project in turn, tagging them with their
    /// project descriptor.
    ///
    /// Projects that return no orders are left out of the result.
    ///
    /// # Errors
    ///
    /// Stops at and returns the first error from [`Self::fetch_all_orders`].
    pub async fn fetch_projects(
        &self,
        projects: &[ProjectConfig],
        date_from: NaiveDate,
    ) -> Result<Vec<ProjectOrders>, ApiError> {
        let mut batches = Vec::with_capacity(projects.len());

        for project in projects {
            let orders = self.fetch_all_orders(&project.login, date_from).await?;
            if orders.is_empty() {
                tracing::info!(login = %project.login, "no orders returned, skipping project");
                continue;
            }

            tracing::info!(
                login = %project.login,
                project = %project.project,
                orders = orders.len(),
                "fetched project orders"
            );
            batches.push(ProjectOrders {
                project: project.clone(),
                orders,
            });
        }

        Ok(batches)
    }

    /// Builds `{base}/orders/advertiser/{login}?pass=..&date_from=..&offset=..`
    /// with every component percent-encoded.
    fn orders_url(
        &self,
        login: &str,
        date_from: NaiveDate,
        offset: usize,
    ) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(["orders", "advertiser", login]);
        url.query_pairs_mut()
            .append_pair("pass", &self.api_key)
            .append_pair("date_from", &date_from.format("%Y-%m-%d").to_string())
            .append_pair("offset", &offset.to_string());
        Ok(url)
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
