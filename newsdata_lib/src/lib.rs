//! Library layer for the news analysis tool: paginated fetching, aggregation,
//! and input validation.
//!
//! Wraps the `newsdata_api` crate with a pagination driver that never fails
//! past its boundary, and provides pure aggregate statistics over the
//! accumulated articles.

pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod session;
pub mod snapshot;
pub mod validation;

pub use newsdata_api;
pub use newsdata_api::types;
pub use newsdata_api::{
    DateRange, EndpointKind, NewsFilters, NewsQuery, ParamValue, TimeUnit, Timeframe,
};

pub use client::NewsClient;
pub use config::FetchConfig;
pub use error::NewsDataError;
pub use session::{
    raw_records, FetchSession, PagePreview, PageProgress, RequestDetails, Termination,
};
pub use snapshot::AggregateSnapshot;
