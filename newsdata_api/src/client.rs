//! HTTP client for the NewsData.io REST API.

use std::time::Duration;

use url::Url;

use crate::{query::NewsQuery, types::NewsResponse, Error};

/// Production API root. Endpoint paths are appended to it.
pub const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1";

/// HTTP client for the news API.
///
/// Each request builds a fresh `reqwest::Client` with the configured timeout
/// (30 seconds unless overridden). The API key is passed per call and is
/// attached after the request URL has been logged.
pub struct Client {
    /// Base URL for the API. Defaults to [`DEFAULT_BASE_URL`].
    base_api_url: String,
    timeout: Duration,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    /// Creates a new client pointing at the production API.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_api_url: base_url.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    /// Full endpoint URL for a query, without parameters.
    pub fn endpoint_url(&self, query: &NewsQuery) -> Result<Url, Error> {
        let base = Url::parse(&self.base_api_url).map_err(|e| {
            tracing::error!("Invalid base URL {}: {}", self.base_api_url, e);
            Error::RequestFailed(format!("invalid base URL: {}", e))
        })?;
        Ok(query.endpoint_url(&base))
    }

    /// Fetches one page for `query`.
    ///
    /// HTTP 429 maps to [`Error::RateLimited`]. The body is parsed whatever the
    /// HTTP status, because the API reports application errors as a normal
    /// response with `status: "error"` and a 4xx code.
    pub async fn get_page(&self, api_key: &str, query: &NewsQuery) -> Result<NewsResponse, Error> {
        let url = query.add_to_url(&self.endpoint_url(query)?);
        tracing::debug!("GET {}", url);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::RequestFailed(e.to_string())
            })?;
        let resp = client
            .get(url)
            .query(&[("apikey", api_key)])
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Failed to get resource: {}", e);
                Error::RequestFailed(e.to_string())
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            tracing::warn!("Rate limited by the API (HTTP 429)");
            return Err(Error::RateLimited);
        }

        let body = resp.text().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to read response body: {}", e);
            Error::RequestFailed(e.to_string())
        })?;

        match serde_json::from_str::<NewsResponse>(&body) {
            Ok(parsed) => Ok(parsed),
            Err(_) if !status.is_success() => {
                let snippet = truncate_body(&body);
                tracing::error!("Request failed with status {}: {}", status, snippet);
                Err(Error::HttpStatus {
                    status: status.as_u16(),
                    body: snippet,
                })
            }
            Err(e) => {
                let snippet = truncate_body(&body);
                tracing::error!("Failed to parse resource: {} | body: {}", e, snippet);
                Err(Error::Parse(e.to_string()))
            }
        }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
