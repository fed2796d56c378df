//! Aggregate statistics over accumulated articles.
//!
//! All functions are pure: they read a slice of articles and return fresh
//! collections, so recomputing on the same slice yields the same output.
//! Missing optional fields exclude an article from the statistic that needs
//! them; they never abort the computation.

use std::collections::{BTreeMap, HashMap, HashSet};

use newsdata_api::types::{Article, Sentiment, SentimentStats};
use serde::Serialize;

/// Bucket for articles without a source name.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// Default row counts for ranked statistics.
pub const TOP_SOURCES: usize = 10;
pub const TOP_CATEGORIES: usize = 8;
pub const TOP_COUNTRIES: usize = 10;

/// Averages and extrema of per-article sentiment percentages.
#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct SentimentSummary {
    pub avg_positive: f64,
    pub avg_neutral: f64,
    pub avg_negative: f64,
    pub max_positive: f64,
    pub max_negative: f64,
    pub min_positive: f64,
    pub min_negative: f64,
    /// Number of articles that carried sentiment stats.
    pub sample_size: usize,
}

/// Normalizes a raw keyword list: trims and lowercases, then drops empty
/// entries, nulls, and the literal string `"null"` in any case.
/// Order and duplicates are preserved.
pub fn clean_keywords<S: AsRef<str>>(raw: &[Option<S>]) -> Vec<String> {
    raw.iter()
        .flatten()
        .map(|kw| kw.as_ref().trim().to_lowercase())
        .filter(|kw| !kw.is_empty() && kw != "null")
        .collect()
}

/// Sentiment averages and extrema over the articles that carry
/// `sentiment_stats`. Returns `None` when no article does, so "no data" is
/// distinguishable from "all zero".
pub fn sentiment_summary(articles: &[Article]) -> Option<SentimentSummary> {
    let stats: Vec<_> = articles.iter().filter_map(|a| a.sentiment_stats).collect();
    if stats.is_empty() {
        return None;
    }
    let n = stats.len() as f64;
    let sum = |f: fn(&SentimentStats) -> f64| stats.iter().map(f).sum::<f64>();
    let max = |f: fn(&SentimentStats) -> f64| stats.iter().map(f).fold(f64::NEG_INFINITY, f64::max);
    let min = |f: fn(&SentimentStats) -> f64| stats.iter().map(f).fold(f64::INFINITY, f64::min);

    Some(SentimentSummary {
        avg_positive: sum(|s| s.positive) / n,
        avg_neutral: sum(|s| s.neutral) / n,
        avg_negative: sum(|s| s.negative) / n,
        max_positive: max(|s| s.positive),
        max_negative: max(|s| s.negative),
        min_positive: min(|s| s.positive),
        min_negative: min(|s| s.negative),
        sample_size: stats.len(),
    })
}

/// Counts labels and ranks them by count, descending. Ties keep the order in
/// which labels were first seen. `limit` truncates the ranking.
pub fn rank_counts<I>(labels: I, limit: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = String>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for label in labels {
        match index.get(&label) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(label.clone(), counts.len());
                counts.push((label, 1));
            }
        }
    }
    // stable sort keeps first-seen order among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(limit);
    counts
}

/// Articles per source name. Articles without a name count as [`UNKNOWN_SOURCE`].
pub fn source_frequency(articles: &[Article], limit: usize) -> Vec<(String, usize)> {
    rank_counts(
        articles.iter().map(|a| {
            a.source_name
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .unwrap_or(UNKNOWN_SOURCE)
                .to_string()
        }),
        limit,
    )
}

/// Articles per category. An article with several categories counts once in each.
pub fn category_frequency(articles: &[Article], limit: usize) -> Vec<(String, usize)> {
    rank_counts(
        articles
            .iter()
            .flat_map(|a| a.category.iter())
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        limit,
    )
}

/// Articles per country code, upper-cased before counting.
pub fn country_frequency(articles: &[Article], limit: usize) -> Vec<(String, usize)> {
    rank_counts(country_codes(articles), limit)
}

/// Articles per sentiment label. Articles without a label count as neutral.
pub fn sentiment_distribution(articles: &[Article]) -> Vec<(Sentiment, usize)> {
    let mut counts: Vec<(Sentiment, usize)> = Vec::new();
    for article in articles {
        let label = article.sentiment.unwrap_or(Sentiment::Neutral);
        match counts.iter_mut().find(|(s, _)| *s == label) {
            Some(entry) => entry.1 += 1,
            None => counts.push((label, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Cleaned keyword counts, keeping only keywords seen more than once.
pub fn keyword_frequency(articles: &[Article]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for keyword in all_keywords(articles) {
        *counts.entry(keyword).or_default() += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}

/// The `limit` most frequent repeated keywords, ties in first-seen order.
pub fn top_keywords(articles: &[Article], limit: usize) -> Vec<(String, usize)> {
    let mut ranked = rank_counts(all_keywords(articles), usize::MAX);
    ranked.retain(|(_, count)| *count > 1);
    ranked.truncate(limit);
    ranked
}

/// Articles per publication day, ascending by date. Articles without
/// `pubDate` are left out.
pub fn timeline(articles: &[Article]) -> Vec<(String, usize)> {
    let mut by_day: BTreeMap<String, usize> = BTreeMap::new();
    for day in articles.iter().filter_map(|a| a.pub_day()) {
        *by_day.entry(day.to_string()).or_default() += 1;
    }
    by_day.into_iter().collect()
}

/// Distinct non-empty source ids.
pub fn unique_source_count(articles: &[Article]) -> usize {
    articles
        .iter()
        .filter_map(|a| a.source_id.as_deref())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Distinct non-empty country codes, compared case-insensitively.
pub fn unique_country_count(articles: &[Article]) -> usize {
    country_codes(articles).collect::<HashSet<_>>().len()
}

fn country_codes(articles: &[Article]) -> impl Iterator<Item = String> + '_ {
    articles
        .iter()
        .flat_map(|a| a.country.iter())
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
}

fn all_keywords(articles: &[Article]) -> impl Iterator<Item = String> + '_ {
    articles.iter().flat_map(|a| clean_keywords(&a.keywords))
}
