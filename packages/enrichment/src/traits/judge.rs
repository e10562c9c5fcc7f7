//! The remote judgment trait.
//!
//! The pipeline treats the external vision/text/scoring capabilities as a
//! single "remote judgment" interface with one method per judgment type.
//! This isolates the pipeline from any particular model API and makes it
//! trivially mockable for tests.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::category::CategoryProfile;
use crate::types::footprint::FootprintResult;
use crate::types::report::{AttributeGuess, ProductIdentity, ProductImage};

/// External model capabilities consumed by the pipeline.
///
/// Implementations wrap a specific provider (OpenAI, etc.) and handle the
/// specifics of prompting and response parsing. Responses are noisy text;
/// implementations must locate and parse the first well-formed JSON object
/// (see [`crate::judges::extract_json_object`]).
#[async_trait]
pub trait ProductJudge: Send + Sync {
    /// Identify the product in the image. Never skipped: this call seeds
    /// every downstream step.
    ///
    /// Fails with [`crate::error::EnrichmentError::Identification`] when
    /// the response cannot be parsed into a shape with at least a name.
    async fn identify(&self, image: &ProductImage) -> Result<ProductIdentity>;

    /// Guess ingredients and packaging from the image. Fallback path,
    /// invoked only when aggregation found zero ingredients.
    ///
    /// Same parse-failure contract as [`identify`](Self::identify).
    async fn guess_attributes(&self, image: &ProductImage) -> Result<AttributeGuess>;

    /// Expand a product name into a structured category profile.
    ///
    /// Fails with [`crate::error::EnrichmentError::Categorization`] on
    /// unparseable output. No retry; a failure here is fatal to the
    /// similar-products path only.
    async fn categorize(&self, product_name: &str) -> Result<CategoryProfile>;

    /// Convert an ingredients/packaging profile into a footprint verdict.
    ///
    /// Fails with [`crate::error::EnrichmentError::Scoring`] when the
    /// response cannot be parsed as the expected numeric structure. No
    /// in-pipeline retries; the caller decides whether this is fatal
    /// (main product) or per-item-skippable (candidates).
    async fn score_footprint(
        &self,
        ingredients: &[String],
        packaging_materials: &[String],
        recyclable: bool,
    ) -> Result<FootprintResult>;
}
