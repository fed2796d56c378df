//! Shared query vocabulary: endpoint kinds, parameter values, and time windows.

use std::str::FromStr;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The three news endpoints. Each maps to a fixed path under the API base URL.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    /// Articles from the last 48 hours.
    Latest,
    /// Crypto-related articles, filterable by coin.
    Crypto,
    /// Historical articles addressed by an absolute date range.
    Archive,
}

impl EndpointKind {
    /// Path segment appended to the API base URL.
    pub fn path(&self) -> &'static str {
        match self {
            EndpointKind::Latest => "latest",
            EndpointKind::Crypto => "crypto",
            EndpointKind::Archive => "archive",
        }
    }

    /// Whether this endpoint takes a relative `timeframe` rather than a date range.
    pub fn uses_timeframe(&self) -> bool {
        !matches!(self, EndpointKind::Archive)
    }
}

impl std::fmt::Display for EndpointKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                EndpointKind::Latest => "Latest News",
                EndpointKind::Crypto => "Crypto News",
                EndpointKind::Archive => "Archive News",
            }
        )
    }
}

impl FromStr for EndpointKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "latest" => Ok(EndpointKind::Latest),
            "crypto" => Ok(EndpointKind::Crypto),
            "archive" => Ok(EndpointKind::Archive),
            _ => Err(()),
        }
    }
}

/// A query parameter value. The API accepts plain strings and integers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum ParamValue {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Text(s.to_string())
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Number(n)
    }
}

/// Unit of a relative `timeframe` window.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Hours,
    Minutes,
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                TimeUnit::Hours => "hours",
                TimeUnit::Minutes => "minutes",
            }
        )
    }
}

impl FromStr for TimeUnit {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hours" | "h" => Ok(TimeUnit::Hours),
            "minutes" | "m" => Ok(TimeUnit::Minutes),
            _ => Err(()),
        }
    }
}

/// Relative window used by the Latest and Crypto endpoints. The value is sent
/// as a bare number whichever unit is selected.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timeframe {
    pub unit: TimeUnit,
    pub value: i64,
}

impl Default for Timeframe {
    fn default() -> Self {
        Self {
            unit: TimeUnit::Hours,
            value: 24,
        }
    }
}

impl Timeframe {
    pub fn hours(value: i64) -> Self {
        Self {
            unit: TimeUnit::Hours,
            value,
        }
    }

    pub fn minutes(value: i64) -> Self {
        Self {
            unit: TimeUnit::Minutes,
            value,
        }
    }
}

/// Absolute, inclusive date range used by the Archive endpoint.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// The `days`-long range that ends on `to`.
    pub fn ending_on(to: NaiveDate, days: i64) -> Self {
        Self {
            from: to - Duration::days(days),
            to,
        }
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::ending_on(Utc::now().date_naive(), 30)
    }
}
