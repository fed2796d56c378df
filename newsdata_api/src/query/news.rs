//! The news query builder: user filters in, immutable request descriptor out.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::types::Sentiment;

use super::common::{DateRange, EndpointKind, ParamValue, Timeframe};

/// User-selected filters shared by every page of a fetch.
///
/// Empty strings mean "no filter". Values are not validated here; invalid
/// input is passed through and surfaces as an API error.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct NewsFilters {
    /// Free-text search anywhere in the article (`q`).
    pub query: String,
    /// Search restricted to titles (`qInTitle`).
    pub title_query: String,
    /// Comma-separated country codes.
    pub country: String,
    pub language: String,
    pub category: String,
    pub sentiment: Option<Sentiment>,
    /// Comma-separated source domains.
    pub domain: String,
    /// Comma-separated coin symbols. Only sent to the Crypto endpoint.
    pub coin: String,
    /// Window for Latest and Crypto.
    pub timeframe: Timeframe,
    /// Window for Archive.
    pub date_range: DateRange,
}

impl NewsFilters {
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = query.to_string();
        self
    }

    pub fn with_title_query(mut self, title_query: &str) -> Self {
        self.title_query = title_query.to_string();
        self
    }

    pub fn with_country(mut self, country: &str) -> Self {
        self.country = country.to_string();
        self
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn with_domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }

    pub fn with_coin(mut self, coin: &str) -> Self {
        self.coin = coin.to_string();
        self
    }

    pub fn with_timeframe(mut self, timeframe: Timeframe) -> Self {
        self.timeframe = timeframe;
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }
}

/// Immutable description of a single page request.
///
/// Built fresh for every page because the cursor changes. The API key is
/// deliberately absent, so a descriptor can be displayed or logged as-is.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct NewsQuery {
    endpoint: EndpointKind,
    params: BTreeMap<&'static str, ParamValue>,
    cursor: Option<String>,
}

impl NewsQuery {
    /// Maps filters, endpoint kind and an optional pagination cursor to a descriptor.
    ///
    /// Empty filters are omitted rather than sent as empty strings. Latest and
    /// Crypto always carry `timeframe`; Archive always carries `from_date` and
    /// `to_date`. The cursor becomes the `page` parameter when present.
    pub fn build(filters: &NewsFilters, endpoint: EndpointKind, cursor: Option<&str>) -> Self {
        let mut params = BTreeMap::new();

        let text_filters = [
            ("q", &filters.query),
            ("qInTitle", &filters.title_query),
            ("country", &filters.country),
            ("language", &filters.language),
            ("category", &filters.category),
            ("domain", &filters.domain),
        ];
        for (key, value) in text_filters {
            insert_text(&mut params, key, value);
        }
        if let Some(sentiment) = filters.sentiment {
            params.insert("sentiment", ParamValue::Text(sentiment.to_string()));
        }
        if endpoint == EndpointKind::Crypto {
            insert_text(&mut params, "coin", &filters.coin);
        }

        if endpoint.uses_timeframe() {
            params.insert("timeframe", ParamValue::Number(filters.timeframe.value));
        } else {
            params.insert(
                "from_date",
                ParamValue::Text(filters.date_range.from.format("%Y-%m-%d").to_string()),
            );
            params.insert(
                "to_date",
                ParamValue::Text(filters.date_range.to.format("%Y-%m-%d").to_string()),
            );
        }

        let cursor = cursor.filter(|c| !c.is_empty()).map(str::to_string);
        if let Some(ref cursor) = cursor {
            params.insert("page", ParamValue::Text(cursor.clone()));
        }

        Self {
            endpoint,
            params,
            cursor,
        }
    }

    pub fn endpoint(&self) -> EndpointKind {
        self.endpoint
    }

    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// The parameter map, without the API key.
    pub fn params(&self) -> &BTreeMap<&'static str, ParamValue> {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.params.get(key)
    }

    /// Joins the endpoint path onto `base`.
    pub fn endpoint_url(&self, base: &Url) -> Url {
        let mut url = base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(self.endpoint.path());
        }
        url
    }

    /// Appends this query's parameters to the given URL, returning the modified URL.
    pub fn add_to_url(&self, url: &Url) -> Url {
        let mut url = url.clone();
        for (key, value) in self.params.iter() {
            url.query_pairs_mut()
                .append_pair(key, value.to_string().as_str());
        }
        url
    }
}

fn insert_text(params: &mut BTreeMap<&'static str, ParamValue>, key: &'static str, value: &str) {
    if !value.trim().is_empty() {
        params.insert(key, ParamValue::Text(value.trim().to_string()));
    }
}
