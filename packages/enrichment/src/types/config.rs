//! Configuration for the enrichment pipeline.

use serde::{Deserialize, Serialize};

/// Tunables for candidate matching and per-candidate enrichment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Lower bound of the price window as a factor of the input price.
    /// Default: 0.7.
    pub price_window_low: f64,

    /// Upper bound of the price window as a factor of the input price.
    /// Default: 1.3.
    pub price_window_high: f64,

    /// Minimum combined characteristic + target-use substring hits for a
    /// candidate to be accepted. Default: 2.
    pub min_characteristic_hits: usize,

    /// Maximum candidates returned after ranking. Default: 15.
    pub max_candidates: usize,

    /// Bounded timeout for each remote fetch, in seconds. Default: 10.
    pub fetch_timeout_secs: u64,

    /// Concurrency limit for per-candidate enrichment. 1 means strictly
    /// sequential, which is also conformant. Default: 4.
    pub enrichment_concurrency: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            price_window_low: 0.7,
            price_window_high: 1.3,
            min_characteristic_hits: 2,
            max_candidates: 15,
            fetch_timeout_secs: 10,
            enrichment_concurrency: 4,
        }
    }
}

impl PipelineConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the price window factors.
    pub fn with_price_window(mut self, low: f64, high: f64) -> Self {
        self.price_window_low = low;
        self.price_window_high = high;
        self
    }

    /// Set the minimum characteristic hit count.
    pub fn with_min_characteristic_hits(mut self, hits: usize) -> Self {
        self.min_characteristic_hits = hits;
        self
    }

    /// Set the maximum candidate count.
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max;
        self
    }

    /// Set the fetch timeout.
    pub fn with_fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.fetch_timeout_secs = secs;
        self
    }

    /// Set the enrichment concurrency limit (minimum 1).
    pub fn with_enrichment_concurrency(mut self, limit: usize) -> Self {
        self.enrichment_concurrency = limit.max(1);
        self
    }

    /// The inclusive price window for a given input price.
    pub fn price_window(&self, price: f64) -> (f64, f64) {
        (price * self.price_window_low, price * self.price_window_high)
    }
}
