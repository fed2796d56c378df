//! Article records returned in the `results` array.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::lenient;

/// A single news article.
///
/// Every recognized field is optional. Missing or malformed values degrade to
/// `None` or an empty list instead of failing the page. Fields this crate does
/// not model are kept verbatim in [`Article::extra`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Article {
    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub source_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub source_name: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub description: Option<String>,

    #[serde(default, deserialize_with = "lenient::optional_string")]
    pub link: Option<String>,

    /// Publication timestamp, `YYYY-MM-DD HH:MM:SS`.
    #[serde(
        rename = "pubDate",
        default,
        deserialize_with = "lenient::optional_string"
    )]
    pub pub_date: Option<String>,

    #[serde(default, deserialize_with = "lenient::sentiment")]
    pub sentiment: Option<Sentiment>,

    #[serde(default, deserialize_with = "lenient::sentiment_stats")]
    pub sentiment_stats: Option<SentimentStats>,

    /// Raw keywords. May contain nulls and the literal string `"null"`.
    #[serde(default, deserialize_with = "lenient::nullable_string_list")]
    pub keywords: Vec<Option<String>>,

    #[serde(default, deserialize_with = "lenient::string_list")]
    pub category: Vec<String>,

    /// ISO country codes in whatever case the API sent.
    #[serde(default, deserialize_with = "lenient::string_list")]
    pub country: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// The record exactly as the API sent it. Set for articles parsed from a
    /// response page, `None` for articles built in code.
    #[serde(skip)]
    pub raw: Option<Value>,
}

impl Article {
    /// Calendar-day part of `pubDate` (everything before the first space).
    /// The record as received, falling back to the typed view when no raw
    /// JSON was kept.
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        match &self.raw {
            Some(raw) => Ok(raw.clone()),
            None => serde_json::to_value(self),
        }
    }

    pub fn pub_day(&self) -> Option<&str> {
        self.pub_date
            .as_deref()
            .and_then(|d| d.split(' ').next())
            .filter(|d| !d.is_empty())
    }
}

/// Per-article sentiment percentages (0-100).
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct SentimentStats {
    #[serde(default)]
    pub positive: f64,
    #[serde(default)]
    pub neutral: f64,
    #[serde(default)]
    pub negative: f64,
}

/// Article-level sentiment label.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sentiment {
    #[serde(rename = "positive")]
    Positive,

    #[serde(rename = "neutral")]
    Neutral,

    #[serde(rename = "negative")]
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Sentiment::Positive => "positive",
                Sentiment::Neutral => "neutral",
                Sentiment::Negative => "negative",
            }
        )
    }
}

impl FromStr for Sentiment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            _ => Err(()),
        }
    }
}
