//! Product Eco-Impact Enrichment Library
//!
//! Turns a single product photo plus a price into a full environmental
//! report: identification, ingredient and packaging evidence from
//! catalog sites, a carbon-footprint verdict, and a ranked list of
//! comparable alternatives.
//!
//! # Design Philosophy
//!
//! **"Degrade, don't die"**
//!
//! - Provider failures are logged and skipped, never fatal
//! - Vision fallback when no catalog carries the product
//! - Deterministic filtering and ranking; the model only judges
//! - Library handles mechanics, the judge handles semantics
//!
//! # Usage
//!
//! ```rust,ignore
//! use enrichment::{Analyzer, HttpFetcher, ProductImage};
//! use enrichment::judges::OpenAiJudge;
//!
//! let analyzer = Analyzer::new(HttpFetcher::new(), OpenAiJudge::from_env()?);
//! let report = analyzer.analyze(&ProductImage::jpeg(photo_bytes), 249.0).await?;
//!
//! println!("{}: {}", report.name, report.carbon_footprint.score);
//! for similar in &report.similar_products {
//!     println!("  {} ({})", similar.name, similar.link);
//! }
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (ProductJudge, PageFetcher)
//! - [`types`] - Pipeline data types
//! - [`pipeline`] - The Analyzer orchestrating one analysis run
//! - [`providers`] - The Source Registry of catalog sites
//! - [`scrape`] - Per-provider extraction and aggregation
//! - [`candidates`] - Similar-product search, filtering, and ranking
//! - [`judges`] - Judge implementations and response parsing
//! - [`fetchers`] - Fetcher implementations (HTTP, rate limited)
//! - [`testing`] - Mock implementations for testing

pub mod candidates;
pub mod error;
pub mod fetchers;
pub mod judges;
pub mod pipeline;
pub mod providers;
pub mod scrape;
pub mod testing;
pub mod traits;
pub mod types;

// Re-export core types at crate root
pub use error::{EnrichmentError, ExtractError, FetchError, Result};
pub use fetchers::{FetcherExt, HttpFetcher, RateLimitedFetcher};
pub use pipeline::Analyzer;
pub use providers::{default_registry, ProviderSpec, SelectorRules};
pub use traits::fetcher::PageFetcher;
pub use traits::judge::ProductJudge;
pub use types::candidate::{CandidateProduct, PackagingInfo, ResultItem};
pub use types::category::CategoryProfile;
pub use types::config::PipelineConfig;
pub use types::footprint::{FootprintDetails, FootprintResult};
pub use types::fragment::ScrapedFragment;
pub use types::report::{AttributeGuess, ProductIdentity, ProductImage, ProductReport};

#[cfg(feature = "openai")]
pub use judges::OpenAiJudge;
