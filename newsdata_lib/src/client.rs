//! Pagination driver around the API client.

use newsdata_api::types::Article;
use newsdata_api::{Client, EndpointKind, Error, NewsFilters, NewsQuery};
use url::Url;

use crate::config::{FetchConfig, MAX_PAGES_CAP};
use crate::error::NewsDataError;
use crate::session::{FetchSession, PageProgress, PagePreview, RequestDetails, Termination};

/// API client bound to one API key, with pagination and session handling.
///
/// Requests are strictly sequential: each page depends on the cursor returned
/// by the previous one. Rate limits and failures stop the loop immediately
/// without retry.
pub struct NewsClient {
    inner: Client,
    api_key: String,
    config: FetchConfig,
}

/// What to do after a page has been handled.
enum Step {
    Continue(String),
    Stop(Termination),
}

impl NewsClient {
    /// Creates a client using configuration from the environment.
    pub fn new(api_key: &str) -> Self {
        Self::with_config(api_key, FetchConfig::from_env())
    }

    pub fn with_config(api_key: &str, config: FetchConfig) -> Self {
        Self {
            inner: Client::with_base_url(&config.base_url).with_timeout(config.request_timeout),
            api_key: api_key.to_string(),
            config,
        }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    fn request_details(&self, query: &NewsQuery) -> Result<RequestDetails, NewsDataError> {
        let base = Url::parse(self.inner.base_url()).map_err(|e| {
            NewsDataError::InvalidInput(format!("invalid base URL '{}': {}", self.inner.base_url(), e))
        })?;
        Ok(RequestDetails::new(query, &base))
    }

    /// Issues the first-page request only and reports how many results the
    /// query matches.
    pub async fn preview(
        &self,
        endpoint: EndpointKind,
        filters: &NewsFilters,
    ) -> Result<PagePreview, NewsDataError> {
        let query = NewsQuery::build(filters, endpoint, None);
        let request = self.request_details(&query)?;
        let resp = self.inner.get_page(&self.api_key, &query).await?;
        if resp.is_error() {
            let message = resp.error_message();
            tracing::error!("API error: {}", message);
            return Err(NewsDataError::Rejected(message));
        }
        let total_results = resp.total_results.unwrap_or(0);
        let first_page_count = resp.into_articles().len();
        Ok(PagePreview {
            total_results,
            first_page_count,
            request,
        })
    }

    /// Fetches pages until the API runs out of cursors, an error or rate
    /// limit stops the loop, or the page budget is spent.
    ///
    /// Never fails: every failure becomes the session's [`Termination`], and
    /// whatever was collected before it is kept. `on_progress` is called once
    /// per completed page, before the next request is sent.
    pub async fn fetch_all<F>(
        &self,
        endpoint: EndpointKind,
        filters: &NewsFilters,
        mut on_progress: F,
    ) -> FetchSession
    where
        F: FnMut(PageProgress),
    {
        let max_pages = self.config.max_pages.min(MAX_PAGES_CAP);
        let mut records: Vec<Article> = Vec::new();
        let mut pages_fetched = 0usize;
        let mut total_results = None;
        let mut last_request = None;
        let mut cursor: Option<String> = None;

        let termination = loop {
            if pages_fetched >= max_pages {
                break Termination::MaxPagesReached;
            }

            let query = NewsQuery::build(filters, endpoint, cursor.as_deref());
            last_request = self.request_details(&query).ok();
            tracing::debug!(
                "Requesting page {} of {} ({})",
                pages_fetched + 1,
                max_pages,
                endpoint
            );

            let resp = match self.inner.get_page(&self.api_key, &query).await {
                Ok(resp) => resp,
                Err(Error::RateLimited) => {
                    tracing::warn!(
                        "Rate limit reached after {} pages, keeping {} articles",
                        pages_fetched,
                        records.len()
                    );
                    break Termination::RateLimited;
                }
                Err(e) => {
                    tracing::warn!(
                        "Fetch failed after {} pages, keeping {} articles: {}",
                        pages_fetched,
                        records.len(),
                        e
                    );
                    break Termination::TransportError {
                        message: e.to_string(),
                    };
                }
            };

            if resp.is_error() {
                let message = resp.error_message();
                tracing::error!("API error on page {}: {}", pages_fetched + 1, message);
                break Termination::ApiError { message };
            }

            if pages_fetched == 0 {
                total_results = resp.total_results;
            }
            let next = resp.next_cursor().map(str::to_string);
            records.extend(resp.into_articles());
            pages_fetched += 1;

            on_progress(PageProgress {
                page: pages_fetched,
                records: records.len(),
                max_pages,
            });

            match self.next_step(endpoint, next, pages_fetched, max_pages) {
                Step::Stop(termination) => break termination,
                Step::Continue(next_cursor) => {
                    if endpoint == EndpointKind::Archive && !self.config.archive_delay.is_zero() {
                        tokio::time::sleep(self.config.archive_delay).await;
                    }
                    cursor = Some(next_cursor);
                }
            }
        };

        tracing::info!(
            "Fetch finished: {} pages, {} articles ({})",
            pages_fetched,
            records.len(),
            termination
        );

        FetchSession {
            endpoint,
            records,
            pages_fetched,
            total_results,
            last_request,
            termination,
        }
    }

    fn next_step(
        &self,
        endpoint: EndpointKind,
        next: Option<String>,
        pages_fetched: usize,
        max_pages: usize,
    ) -> Step {
        match next {
            None => Step::Stop(Termination::Exhausted),
            Some(_) if pages_fetched >= max_pages => {
                tracing::info!(
                    "Stopping {} fetch at the {}-page limit",
                    endpoint,
                    max_pages
                );
                Step::Stop(Termination::MaxPagesReached)
            }
            Some(cursor) => Step::Continue(cursor),
        }
    }
}
