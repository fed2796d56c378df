mod common;
pub use self::common::{DateRange, EndpointKind, ParamValue, TimeUnit, Timeframe};

mod news;
pub use self::news::{NewsFilters, NewsQuery};
