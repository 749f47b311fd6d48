//! Minimal ClickHouse HTTP interface client.
//!
//! Statements are sent as the POST body; inserts carry the statement in the
//! `query` parameter and the rows in the body. Credentials travel in the
//! `X-ClickHouse-User` / `X-ClickHouse-Key` headers, never in the URL.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::{ClickHouseConfig, StoreError};

pub struct ClickHouseClient {
    client: Client,
    base_url: Url,
    user: String,
    password: String,
    database: String,
}

impl ClickHouseClient {
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`StoreError::InvalidUrl`] if `config.url` does not parse.
    pub fn new(config: &ClickHouseConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("advhouse/0.1 (order-sync)")
            .build()?;

        let normalised = format!("{}/", config.url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| StoreError::InvalidUrl {
            url: config.url.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            user: config.user.clone(),
            password: config.password.clone(),
            database: config.database.clone(),
        })
    }

    #[must_use]
    pub fn database(&self) -> &str {
        &self.database
    }

    /// Checks that the server is reachable via the `/ping` endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] on network failure or
    /// [`StoreError::Server`] on a non-2xx status.
    pub async fn ping(&self) -> Result<(), StoreError> {
        let url = self.base_url.join("ping").map_err(|e| StoreError::InvalidUrl {
            url: self.base_url.to_string(),
            reason: e.to_string(),
        })?;
        let response = self.client.get(url).send().await?;
        Self::read_body(response).await.map(|_| ())
    }

    /// Executes one statement and returns the raw response body.
    ///
    /// Statements that produce no result set (DDL, inserts) come back with
    /// an empty body.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] on network failure or
    /// [`StoreError::Server`] when ClickHouse rejects the statement.
    pub async fn execute(&self, query: &str) -> Result<String, StoreError> {
        let response = self
            .request(self.url(None))
            .body(query.to_owned())
            .send()
            .await?;
        Self::read_body(response).await
    }

    /// Sends `body` as the data of `query` (an `INSERT ... FORMAT ...`).
    ///
    /// # Errors
    ///
    /// Same as [`Self::execute`].
    pub async fn insert(&self, query: &str, body: String) -> Result<(), StoreError> {
        let response = self
            .request(self.url(Some(query)))
            .body(body)
            .send()
            .await?;
        Self::read_body(response).await.map(|_| ())
    }

    fn url(&self, query: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("database", &self.database);
            if let Some(q) = query {
                pairs.append_pair("query", q);
            }
        }
        url
    }

    fn request(&self, url: Url) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("X-ClickHouse-User", &self.user)
            .header("X-ClickHouse-Key", &self.password)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(StoreError::Server {
                status: status.as_u16(),
                message: body.trim().to_owned(),
            });
        }
        Ok(body)
    }
}
