//! Input checks applied to user-supplied query parameters before any request.

use chrono::{Months, NaiveDate, Utc};
use newsdata_api::types::Sentiment;
use newsdata_api::{DateRange, EndpointKind, TimeUnit, Timeframe};

use crate::config::MAX_PAGES_CAP;
use crate::error::NewsDataError;

pub const MAX_SEARCH_LENGTH: usize = 512;
pub const MAX_LIST_ITEMS: usize = 5;
pub const MAX_TIMEFRAME_HOURS: i64 = 48;
pub const MAX_TIMEFRAME_MINUTES: i64 = MAX_TIMEFRAME_HOURS * 60;
pub const MAX_ARCHIVE_YEARS: u32 = 7;

pub const VALID_LANGUAGES: &[&str] = &["en", "es", "fr", "de", "it", "pt", "ar", "zh", "ja", "hi"];

pub const VALID_CATEGORIES: &[&str] = &[
    "business",
    "entertainment",
    "environment",
    "food",
    "health",
    "politics",
    "science",
    "sports",
    "technology",
    "top",
    "world",
];

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, NewsDataError> {
    if input.len() > max_len {
        return Err(NewsDataError::InvalidInput(format!(
            "input exceeds maximum length of {} bytes",
            max_len
        )));
    }
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(NewsDataError::InvalidInput(
            "input is empty after sanitization".to_string(),
        ));
    }
    Ok(sanitized)
}

/// Validate a free-text query (`q` or `qInTitle`).
pub fn validate_search(input: &str) -> Result<String, NewsDataError> {
    sanitize_text(input, MAX_SEARCH_LENGTH)
}

/// Split a comma-separated list, trim each item, drop blanks, and cap the count.
fn split_list(input: &str, what: &str) -> Result<Vec<String>, NewsDataError> {
    let items: Vec<String> = input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect();
    if items.is_empty() {
        return Err(NewsDataError::InvalidInput(format!("{} list is empty", what)));
    }
    if items.len() > MAX_LIST_ITEMS {
        return Err(NewsDataError::InvalidInput(format!(
            "at most {} {} values are allowed, got {}",
            MAX_LIST_ITEMS,
            what,
            items.len()
        )));
    }
    Ok(items)
}

/// Validate a comma-separated list of 2-letter country codes, normalized to lowercase.
pub fn validate_country(input: &str) -> Result<String, NewsDataError> {
    let codes = split_list(input, "country")?;
    for code in &codes {
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(NewsDataError::InvalidInput(format!(
                "invalid country code '{}'. Expected 2-letter ISO code (e.g., us, gb)",
                code
            )));
        }
    }
    Ok(codes.join(","))
}

/// Validate a comma-separated list of supported language codes.
pub fn validate_language(input: &str) -> Result<String, NewsDataError> {
    let codes = split_list(input, "language")?;
    for code in &codes {
        if !VALID_LANGUAGES.contains(&code.as_str()) {
            return Err(NewsDataError::InvalidInput(format!(
                "unknown language '{}'. Valid values: {}",
                code,
                VALID_LANGUAGES.join(", ")
            )));
        }
    }
    Ok(codes.join(","))
}

/// Validate a comma-separated list of supported categories.
pub fn validate_category(input: &str) -> Result<String, NewsDataError> {
    let categories = split_list(input, "category")?;
    for category in &categories {
        if !VALID_CATEGORIES.contains(&category.as_str()) {
            return Err(NewsDataError::InvalidInput(format!(
                "unknown category '{}'. Valid values: {}",
                category,
                VALID_CATEGORIES.join(", ")
            )));
        }
    }
    Ok(categories.join(","))
}

/// Validate a sentiment label: case-insensitive.
pub fn validate_sentiment(input: &str) -> Result<Sentiment, NewsDataError> {
    input.trim().parse::<Sentiment>().map_err(|_| {
        NewsDataError::InvalidInput(format!(
            "unknown sentiment '{}'. Valid values: positive, neutral, negative",
            input
        ))
    })
}

/// Validate a comma-separated list of domains (e.g. `bbc,reuters`).
pub fn validate_domain(input: &str) -> Result<String, NewsDataError> {
    let domains = split_list(input, "domain")?;
    for domain in &domains {
        if !domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
        {
            return Err(NewsDataError::InvalidInput(format!(
                "invalid domain '{}'. Use letters, digits, '.', '-' or '_'",
                domain
            )));
        }
    }
    Ok(domains.join(","))
}

/// Validate a comma-separated list of coin symbols (e.g. `btc,eth`).
pub fn validate_coin(input: &str) -> Result<String, NewsDataError> {
    let coins = split_list(input, "coin")?;
    for coin in &coins {
        if !coin.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(NewsDataError::InvalidInput(format!(
                "invalid coin symbol '{}'. Expected letters and digits (e.g., btc)",
                coin
            )));
        }
    }
    Ok(coins.join(","))
}

/// Validate a timeframe: 1-48 hours or 1-2880 minutes.
pub fn validate_timeframe(unit: &str, value: i64) -> Result<Timeframe, NewsDataError> {
    let unit: TimeUnit = unit.trim().parse().map_err(|_| {
        NewsDataError::InvalidInput(format!(
            "unknown timeframe unit '{}'. Valid values: hours (h), minutes (m)",
            unit
        ))
    })?;
    let max = match unit {
        TimeUnit::Hours => MAX_TIMEFRAME_HOURS,
        TimeUnit::Minutes => MAX_TIMEFRAME_MINUTES,
    };
    if !(1..=max).contains(&value) {
        return Err(NewsDataError::InvalidInput(format!(
            "timeframe must be between 1 and {} {}, got {}",
            max, unit, value
        )));
    }
    Ok(Timeframe { unit, value })
}

/// Validate a YYYY-MM-DD date string.
pub fn validate_date(input: &str) -> Result<NaiveDate, NewsDataError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        NewsDataError::InvalidInput(format!(
            "invalid date '{}'. Expected format: YYYY-MM-DD (e.g., 2024-06-01)",
            trimmed
        ))
    })
}

/// Validate an archive window: from <= to, neither in the future, and no
/// more than seven years back.
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> Result<DateRange, NewsDataError> {
    let today = Utc::now().date_naive();
    if from > to {
        return Err(NewsDataError::InvalidInput(format!(
            "from date {} is after to date {}",
            from, to
        )));
    }
    if to > today {
        return Err(NewsDataError::InvalidInput(format!(
            "to date {} is in the future",
            to
        )));
    }
    let earliest = today
        .checked_sub_months(Months::new(MAX_ARCHIVE_YEARS * 12))
        .unwrap_or(NaiveDate::MIN);
    if from < earliest {
        return Err(NewsDataError::InvalidInput(format!(
            "from date {} is more than {} years back (earliest {})",
            from, MAX_ARCHIVE_YEARS, earliest
        )));
    }
    Ok(DateRange::new(from, to))
}

/// Validate max pages per analysis run (must be 1..=50).
pub fn validate_max_pages(max_pages: usize) -> Result<usize, NewsDataError> {
    if !(1..=MAX_PAGES_CAP).contains(&max_pages) {
        return Err(NewsDataError::InvalidInput(format!(
            "max pages must be between 1 and {}, got {}",
            MAX_PAGES_CAP, max_pages
        )));
    }
    Ok(max_pages)
}

/// Validate an endpoint name: latest, crypto or archive.
pub fn validate_endpoint(input: &str) -> Result<EndpointKind, NewsDataError> {
    input.trim().parse::<EndpointKind>().map_err(|_| {
        NewsDataError::InvalidInput(format!(
            "unknown endpoint '{}'. Valid values: latest, crypto, archive",
            input
        ))
    })
}
