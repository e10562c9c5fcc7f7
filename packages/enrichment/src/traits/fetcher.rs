//! Page fetching trait.

use async_trait::async_trait;

use crate::error::FetchResult;

/// Fetches raw markup for one URL.
///
/// Keeping this behind a trait lets the Extractor and both pipelines run
/// against canned HTML in tests without a network.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page body. One network request per call; errors map to
    /// [`crate::error::FetchError`], including timeouts.
    async fn fetch(&self, url: &str) -> FetchResult<String>;
}
