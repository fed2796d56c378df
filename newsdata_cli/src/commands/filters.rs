use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Args;
use newsdata_lib::validation;
use newsdata_lib::{DateRange, EndpointKind, NewsFilters};

/// Filter flags shared by `search` and `analyze`.
#[derive(Args)]
pub struct FilterArgs {
    /// NewsData.io API key
    #[arg(long, env = "NEWSDATA_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Endpoint: latest, crypto, archive
    #[arg(long, default_value = "latest")]
    pub endpoint: String,

    /// Free-text query
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Query matched against titles only
    #[arg(long)]
    pub title: Option<String>,

    /// Comma-separated 2-letter country codes (e.g. us,gb)
    #[arg(long)]
    pub country: Option<String>,

    /// Comma-separated language codes (e.g. en,fr)
    #[arg(long)]
    pub language: Option<String>,

    /// Comma-separated categories (e.g. business,technology)
    #[arg(long)]
    pub category: Option<String>,

    /// Sentiment: positive, neutral, negative
    #[arg(long)]
    pub sentiment: Option<String>,

    /// Comma-separated source domains (e.g. bbc,reuters)
    #[arg(long)]
    pub domain: Option<String>,

    /// Comma-separated coin symbols, crypto endpoint only (e.g. btc,eth)
    #[arg(long)]
    pub coin: Option<String>,

    /// Timeframe unit for latest/crypto: hours (h) or minutes (m)
    #[arg(long, default_value = "hours")]
    pub unit: String,

    /// Timeframe value: 1-48 hours or 1-2880 minutes
    #[arg(long, default_value = "24")]
    pub timeframe: i64,

    /// Archive start date (YYYY-MM-DD), defaults to 30 days before --to
    #[arg(long)]
    pub from: Option<String>,

    /// Archive end date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub to: Option<String>,
}

impl FilterArgs {
    pub fn endpoint(&self) -> Result<EndpointKind> {
        Ok(validation::validate_endpoint(&self.endpoint)?)
    }

    /// Validates every flag and builds the filter set for `endpoint`.
    pub fn to_filters(&self, endpoint: EndpointKind) -> Result<NewsFilters> {
        let mut filters = NewsFilters::default();

        if let Some(ref query) = self.query {
            filters = filters.with_query(&validation::validate_search(query)?);
        }
        if let Some(ref title) = self.title {
            filters = filters.with_title_query(&validation::validate_search(title)?);
        }
        if let Some(ref country) = self.country {
            filters = filters.with_country(&validation::validate_country(country)?);
        }
        if let Some(ref language) = self.language {
            filters = filters.with_language(&validation::validate_language(language)?);
        }
        if let Some(ref category) = self.category {
            filters = filters.with_category(&validation::validate_category(category)?);
        }
        if let Some(ref sentiment) = self.sentiment {
            filters = filters.with_sentiment(validation::validate_sentiment(sentiment)?);
        }
        if let Some(ref domain) = self.domain {
            filters = filters.with_domain(&validation::validate_domain(domain)?);
        }
        if let Some(ref coin) = self.coin {
            if endpoint != EndpointKind::Crypto {
                tracing::warn!("--coin only applies to the crypto endpoint, ignoring it");
            }
            filters = filters.with_coin(&validation::validate_coin(coin)?);
        }

        if endpoint.uses_timeframe() {
            filters = filters.with_timeframe(validation::validate_timeframe(&self.unit, self.timeframe)?);
        } else {
            filters = filters.with_date_range(self.date_range()?);
        }

        Ok(filters)
    }

    fn date_range(&self) -> Result<DateRange> {
        let to = match self.to {
            Some(ref to) => validation::validate_date(to)?,
            None => Utc::now().date_naive(),
        };
        let from = match self.from {
            Some(ref from) => validation::validate_date(from)?,
            None => to - Duration::days(30),
        };
        Ok(validation::validate_date_range(from, to)?)
    }
}
