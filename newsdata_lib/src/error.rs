//! Error types for the library layer.

use std::fmt;

/// Errors produced by the library layer, wrapping upstream API errors
/// and adding serialization, input validation, and API-reported failures.
#[derive(Debug)]
pub enum NewsDataError {
    /// An error from the underlying API client.
    Api(newsdata_api::Error),
    /// The API answered with `status: "error"` and this message.
    Rejected(String),
    /// JSON serialization or deserialization failed.
    Serialization(serde_json::Error),
    /// User-provided input failed validation.
    InvalidInput(String),
}

impl fmt::Display for NewsDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {}", e),
            Self::Rejected(msg) => write!(f, "API error: {}", msg),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for NewsDataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<newsdata_api::Error> for NewsDataError {
    fn from(e: newsdata_api::Error) -> Self {
        Self::Api(e)
    }
}

impl From<serde_json::Error> for NewsDataError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization(e)
    }
}
