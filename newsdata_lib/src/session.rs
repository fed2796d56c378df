//! Explicit state for one fetch: accumulated articles, counters, and the
//! reason pagination stopped.

use std::collections::BTreeMap;

use newsdata_api::types::Article;
use newsdata_api::{EndpointKind, NewsQuery};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::NewsDataError;
use crate::snapshot::AggregateSnapshot;

/// Why a paginated fetch stopped.
///
/// Every variant keeps the articles collected so far; none of them discards data.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// The API stopped offering a next-page cursor.
    Exhausted,
    /// HTTP 429. Not retried.
    RateLimited,
    /// The API reported `status: "error"`.
    ApiError { message: String },
    /// Network failure, timeout, or an unreadable response. Not retried.
    TransportError { message: String },
    /// The page budget ran out while more pages were on offer.
    MaxPagesReached,
}

impl Termination {
    /// Whether every available page was fetched.
    pub fn is_complete(&self) -> bool {
        matches!(self, Termination::Exhausted)
    }

    /// Whether the fetch was cut short by a failure rather than by design.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Termination::RateLimited
                | Termination::ApiError { .. }
                | Termination::TransportError { .. }
        )
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Exhausted => write!(f, "all pages fetched"),
            Termination::RateLimited => write!(f, "rate limit reached"),
            Termination::ApiError { message } => write!(f, "API error: {}", message),
            Termination::TransportError { message } => write!(f, "fetch error: {}", message),
            Termination::MaxPagesReached => write!(f, "page limit reached"),
        }
    }
}

/// Progress notification emitted once per completed page, in page order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageProgress {
    /// Pages completed so far (1-based).
    pub page: usize,
    /// Articles accumulated so far.
    pub records: usize,
    pub max_pages: usize,
}

/// Displayable description of a request. Never contains the API key.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct RequestDetails {
    pub endpoint: EndpointKind,
    pub url: String,
    pub params: BTreeMap<String, String>,
}

impl RequestDetails {
    pub fn new(query: &NewsQuery, base: &Url) -> Self {
        Self {
            endpoint: query.endpoint(),
            url: query.endpoint_url(base).to_string(),
            params: query
                .params()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// Result of a single first-page request, used to preview a search.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PagePreview {
    pub total_results: i64,
    pub first_page_count: usize,
    pub request: RequestDetails,
}

/// The outcome of one paginated fetch.
///
/// Owns its articles exclusively, in arrival order. Starting another fetch
/// produces a new session rather than appending to this one.
#[derive(Serialize, Clone, Debug)]
pub struct FetchSession {
    pub endpoint: EndpointKind,
    pub records: Vec<Article>,
    pub pages_fetched: usize,
    /// `totalResults` from the first page. Informational only.
    pub total_results: Option<i64>,
    /// The last request that was built, for display in reports.
    pub last_request: Option<RequestDetails>,
    pub termination: Termination,
}

impl FetchSession {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The accumulated articles as the API sent them, in arrival order.
    pub fn raw_records(&self) -> Result<Vec<Value>, NewsDataError> {
        raw_records(&self.records)
    }

    /// Recomputes every statistic over the accumulated articles.
    pub fn snapshot(&self) -> AggregateSnapshot {
        AggregateSnapshot::compute(&self.records)
    }
}

/// Each article's original JSON. Articles built in code have none and are
/// serialized from their typed fields instead.
pub fn raw_records(articles: &[Article]) -> Result<Vec<Value>, NewsDataError> {
    let mut out = Vec::with_capacity(articles.len());
    for article in articles {
        out.push(article.to_json()?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_classification() {
        assert!(Termination::Exhausted.is_complete());
        assert!(!Termination::Exhausted.is_error());
        assert!(!Termination::MaxPagesReached.is_complete());
        assert!(!Termination::MaxPagesReached.is_error());
        assert!(Termination::RateLimited.is_error());
        assert!(Termination::ApiError {
            message: "x".into()
        }
        .is_error());
        assert!(Termination::TransportError {
            message: "x".into()
        }
        .is_error());
    }

    #[test]
    fn termination_display() {
        let t = Termination::ApiError {
            message: "quota exceeded".into(),
        };
        assert_eq!(t.to_string(), "API error: quota exceeded");
        assert_eq!(Termination::RateLimited.to_string(), "rate limit reached");
    }

    #[test]
    fn termination_serializes_with_reason_tag() {
        let v = serde_json::to_value(Termination::MaxPagesReached).unwrap();
        assert_eq!(v["reason"], "max_pages_reached");
        let v = serde_json::to_value(Termination::TransportError {
            message: "timeout".into(),
        })
        .unwrap();
        assert_eq!(v["reason"], "transport_error");
        assert_eq!(v["message"], "timeout");
    }

    #[test]
    fn request_details_exclude_key() {
        let filters = newsdata_api::NewsFilters::default().with_query("ai");
        let query = NewsQuery::build(&filters, EndpointKind::Latest, None);
        let base = Url::parse("https://newsdata.io/api/1").unwrap();
        let details = RequestDetails::new(&query, &base);
        assert_eq!(details.url, "https://newsdata.io/api/1/latest");
        assert_eq!(details.params.get("q").map(String::as_str), Some("ai"));
        assert_eq!(details.params.get("timeframe").map(String::as_str), Some("24"));
        assert!(!details.params.contains_key("apikey"));
    }

    #[test]
    fn raw_records_return_wire_json() {
        let page = r#"{"status":"success","results":[
            {"title":"Free plan","sentiment":"ONLY AVAILABLE IN PAID PLANS","keywords":null,"country":"us"}
        ]}"#;
        let resp: newsdata_api::types::NewsResponse = serde_json::from_str(page).unwrap();
        let original: Value = serde_json::from_str(page).unwrap();
        let session = FetchSession {
            endpoint: EndpointKind::Latest,
            records: resp.into_articles(),
            pages_fetched: 1,
            total_results: None,
            last_request: None,
            termination: Termination::Exhausted,
        };

        let raw = session.raw_records().unwrap();
        assert_eq!(raw, vec![original["results"][0].clone()]);
        assert_eq!(raw[0]["sentiment"], "ONLY AVAILABLE IN PAID PLANS");
        assert_eq!(raw[0]["country"], "us");
        assert!(raw[0]["keywords"].is_null());
    }

    #[test]
    fn raw_records_fall_back_to_typed_view() {
        let article = Article {
            title: Some("Built locally".to_string()),
            ..Article::default()
        };
        let raw = raw_records(&[article]).unwrap();
        assert_eq!(raw[0]["title"], "Built locally");
        assert!(raw[0]["country"].as_array().unwrap().is_empty());
    }
}
