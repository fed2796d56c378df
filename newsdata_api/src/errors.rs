//! Error types for the API client.

/// Errors that can occur when making API requests.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (network error, timeout, bad URL).
    #[error("Request failed: {0}")]
    RequestFailed(String),
    /// The API answered with HTTP 429.
    #[error("Rate limit reached (HTTP 429)")]
    RateLimited,
    /// The API returned a non-success status and a body that is not a news response.
    #[error("Request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The API returned a success status but the body could not be parsed.
    #[error("Failed to parse response: {0}")]
    Parse(String),
}
