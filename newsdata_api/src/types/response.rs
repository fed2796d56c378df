//! Top-level response envelope shared by all endpoints.

use serde::{Deserialize, Serialize};

use super::article::Article;
use super::lenient;

/// Application-level status reported in the body.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
    #[serde(other)]
    Unknown,
}

/// Error payload carried in `results` when `status` is `"error"`.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ErrorDetail {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub code: Option<String>,
}

/// The `results` field: an article list on success, an error object otherwise.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Results {
    #[serde(deserialize_with = "lenient::articles")]
    Articles(Vec<Article>),
    Error(ErrorDetail),
}

/// One page of results.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsResponse {
    pub status: ResponseStatus,

    #[serde(default)]
    pub results: Option<Results>,

    /// Total matches for the query. Only meaningful on the first page.
    #[serde(default, deserialize_with = "lenient::optional_count")]
    pub total_results: Option<i64>,

    /// Cursor for the next page. Absent on the last page.
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub next_page: Option<String>,
}

impl NewsResponse {
    pub fn is_error(&self) -> bool {
        self.status == ResponseStatus::Error
    }

    /// The message the API attached to an error response.
    pub fn error_message(&self) -> String {
        match &self.results {
            Some(Results::Error(detail)) => detail
                .message
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string()),
            _ => "Unknown error".to_string(),
        }
    }

    /// The next-page cursor, treating an empty string as absent.
    pub fn next_cursor(&self) -> Option<&str> {
        self.next_page.as_deref().filter(|c| !c.is_empty())
    }

    /// Consumes the response, yielding its articles (empty for error payloads).
    pub fn into_articles(self) -> Vec<Article> {
        match self.results {
            Some(Results::Articles(articles)) => articles,
            _ => Vec::new(),
        }
    }
}
