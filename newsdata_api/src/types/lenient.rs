//! Field deserializers that degrade unexpected shapes to "absent".
//!
//! The API substitutes placeholder strings for plan-restricted fields and
//! occasionally sends `null` where a list is expected. None of that should
//! fail a whole page.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::article::{Article, Sentiment, SentimentStats};

/// Accepts an array, a single string, or null. Non-string entries are dropped.
pub(crate) fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => vec![s],
        _ => Vec::new(),
    })
}

/// Like [`string_list`] but keeps non-string entries as `None`, preserving positions.
pub(crate) fn nullable_string_list<'de, D>(deserializer: D) -> Result<Vec<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => vec![Some(s)],
        _ => Vec::new(),
    })
}

pub(crate) fn optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

pub(crate) fn sentiment<'de, D>(deserializer: D) -> Result<Option<Sentiment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

/// Accepts an object only. Each percentage may be a number, a numeric string,
/// or null/missing (read as 0).
pub(crate) fn sentiment_stats<'de, D>(deserializer: D) -> Result<Option<SentimentStats>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Object(fields)) => Some(SentimentStats {
            positive: percentage(fields.get("positive")),
            neutral: percentage(fields.get("neutral")),
            negative: percentage(fields.get("negative")),
        }),
        _ => None,
    })
}

fn percentage(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Parses an article array, keeping each record's original JSON beside the
/// typed view.
pub(crate) fn articles<'de, D>(deserializer: D) -> Result<Vec<Article>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|item| {
            let mut article = Article::deserialize(&item).map_err(D::Error::custom)?;
            article.raw = Some(item);
            Ok(article)
        })
        .collect()
}

/// Accepts an integer, a numeric string, or anything else as absent.
pub(crate) fn optional_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
