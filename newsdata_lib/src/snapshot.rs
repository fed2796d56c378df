//! One-pass bundle of every aggregate statistic over a fetched article set.

use newsdata_api::types::{Article, Sentiment};
use serde::Serialize;

use crate::analysis::{self, SentimentSummary};

/// One row of the sentiment distribution with its share of all articles.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct SentimentShare {
    pub label: Sentiment,
    pub count: usize,
    pub percentage: f64,
}

/// Every aggregate the dashboards and reports display, computed in one pass
/// over the accumulated articles.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct AggregateSnapshot {
    pub total_articles: usize,
    pub unique_sources: usize,
    pub unique_countries: usize,
    pub sentiment: Option<SentimentSummary>,
    pub top_sources: Vec<(String, usize)>,
    pub top_categories: Vec<(String, usize)>,
    pub top_countries: Vec<(String, usize)>,
    pub sentiment_distribution: Vec<SentimentShare>,
    pub keywords: Vec<(String, usize)>,
    pub timeline: Vec<(String, usize)>,
}

/// Number of repeated keywords kept in a snapshot.
pub const TOP_KEYWORDS: usize = 20;

impl AggregateSnapshot {
    pub fn compute(articles: &[Article]) -> Self {
        let total = articles.len();
        let sentiment_distribution = analysis::sentiment_distribution(articles)
            .into_iter()
            .map(|(label, count)| SentimentShare {
                label,
                count,
                percentage: percentage(count, total),
            })
            .collect();

        Self {
            total_articles: total,
            unique_sources: analysis::unique_source_count(articles),
            unique_countries: analysis::unique_country_count(articles),
            sentiment: analysis::sentiment_summary(articles),
            top_sources: analysis::source_frequency(articles, analysis::TOP_SOURCES),
            top_categories: analysis::category_frequency(articles, analysis::TOP_CATEGORIES),
            top_countries: analysis::country_frequency(articles, analysis::TOP_COUNTRIES),
            sentiment_distribution,
            keywords: analysis::top_keywords(articles, TOP_KEYWORDS),
            timeline: analysis::timeline(articles),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_articles == 0
    }
}

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
