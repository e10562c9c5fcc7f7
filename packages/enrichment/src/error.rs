//! Typed errors for the enrichment pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! The taxonomy mirrors how failures propagate: per-provider errors
//! (`FetchError`, `ExtractError`) are recoverable and swallowed by the
//! stage that observes them, while judgment-parse failures are fatal or
//! skippable depending on which stage they hit.

use thiserror::Error;

/// Errors that can abort an analysis or a sub-feature of it.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    /// The vision capability's response could not be parsed into a
    /// product identity (must contain at least a name).
    #[error("product identification failed: {0}")]
    Identification(String),

    /// The text capability's response could not be parsed into a
    /// category profile. Fatal to the similar-products path only.
    #[error("categorization failed: {0}")]
    Categorization(String),

    /// The scoring capability's response could not be parsed as the
    /// expected numeric structure.
    #[error("footprint scoring failed: {0}")]
    Scoring(String),

    /// The remote judgment service itself failed (network, HTTP status).
    #[error("judge error: {0}")]
    Judge(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Provider extraction failed.
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),

    /// The input price was not a positive number.
    #[error("invalid price: {price}")]
    InvalidPrice { price: f64 },
}

/// Errors from extracting one provider's results for one search term.
///
/// Always recoverable: the Aggregator and Candidate Finder log these and
/// move on to the next provider.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The remote was unreachable or returned a non-success status.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The response body could not be parsed at all. Missing expected
    /// elements is NOT this error; absence yields empty fields.
    #[error("unparseable response from {provider}: {reason}")]
    Parse { provider: String, reason: String },
}

/// Errors from a single page fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP transport failure
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success HTTP status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Request exceeded the configured timeout
    #[error("timeout fetching {url}")]
    Timeout { url: String },

    /// URL could not be parsed
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, EnrichmentError>;

/// Result type alias for provider extraction.
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for page fetches.
pub type FetchResult<T> = std::result::Result<T, FetchError>;
