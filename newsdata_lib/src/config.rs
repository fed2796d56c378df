//! Fetch configuration, read from the environment with built-in defaults.

use std::time::Duration;

use newsdata_api::DEFAULT_BASE_URL;

/// Hard cap on pages per fetch. Never exceeded, whatever the API offers.
pub const MAX_PAGES_CAP: usize = 50;

/// Tunables for one paginated fetch.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchConfig {
    /// Page budget, clamped to [`MAX_PAGES_CAP`].
    pub max_pages: usize,
    /// Pause between Archive pages.
    pub archive_delay: Duration,
    /// Per-request timeout.
    pub request_timeout: Duration,
    pub base_url: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_pages: MAX_PAGES_CAP,
            archive_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl FetchConfig {
    /// Reads `NEWSDATA_MAX_PAGES`, `NEWSDATA_ARCHIVE_DELAY_MS`,
    /// `NEWSDATA_TIMEOUT_SECS` and `NEWSDATA_BASE_URL`, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds a config from a variable lookup. Values that do not parse, a page
    /// budget outside 1..=50, and a zero timeout all fall back to the default.
    fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_pages: parse_var::<usize, _>(&get, "NEWSDATA_MAX_PAGES")
                .filter(|n| (1..=MAX_PAGES_CAP).contains(n))
                .unwrap_or(defaults.max_pages),
            archive_delay: parse_var::<u64, _>(&get, "NEWSDATA_ARCHIVE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.archive_delay),
            request_timeout: parse_var::<u64, _>(&get, "NEWSDATA_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            base_url: get("NEWSDATA_BASE_URL")
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(defaults.base_url),
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.min(MAX_PAGES_CAP);
        self
    }

    pub fn with_archive_delay(mut self, delay: Duration) -> Self {
        self.archive_delay = delay;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }
}

fn parse_var<T, F>(get: &F, key: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    get(key).and_then(|val| val.trim().parse::<T>().ok())
}
