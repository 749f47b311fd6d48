use thiserror::Error;

/// Errors returned by the advcake API client.
///
/// HTTP errors are stored without their request URL, because the URL
/// carries the account password as a query parameter.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    ///
    /// Build through [`ApiError::http`] so the URL is stripped.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("unexpected HTTP status {status} for project {login} at offset {offset}")]
    UnexpectedStatus {
        status: u16,
        login: String,
        offset: usize,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("pagination limit reached for project {login}: exceeded {max_pages} pages")]
    PaginationLimit { login: String, max_pages: usize },
}

impl ApiError {
    pub(crate) fn http(err: reqwest::Error) -> Self {
        Self::Http(err.without_url())
    }
}
