//! The analysis pipeline: one photo and a price in, a full report out.

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EnrichmentError, Result};
use crate::providers::{default_registry, ProviderSpec};
use crate::scrape::aggregate::aggregate;
use crate::traits::fetcher::PageFetcher;
use crate::traits::judge::ProductJudge;
use crate::types::candidate::PackagingInfo;
use crate::types::config::PipelineConfig;
use crate::types::report::{ProductImage, ProductReport};

/// Orchestrates the enrichment pipeline.
///
/// Owns the page fetcher, the judgment capability, the Source Registry,
/// and the pipeline tunables. One `analyze` call runs the whole flow:
/// identify, aggregate (with vision fallback), score the main product,
/// then categorize and find comparable alternatives.
///
/// # Example
///
/// ```rust,ignore
/// use enrichment::{Analyzer, HttpFetcher, ProductImage};
/// use enrichment::judges::OpenAiJudge;
///
/// let analyzer = Analyzer::new(HttpFetcher::new(), OpenAiJudge::from_env()?);
/// let report = analyzer.analyze(&ProductImage::jpeg(bytes), 249.0).await?;
/// ```
pub struct Analyzer<F, J> {
    fetcher: F,
    judge: J,
    registry: Vec<ProviderSpec>,
    config: PipelineConfig,
}

impl<F: PageFetcher, J: ProductJudge> Analyzer<F, J> {
    /// Create an analyzer with the default registry and config.
    pub fn new(fetcher: F, judge: J) -> Self {
        Self {
            fetcher,
            judge,
            registry: default_registry(),
            config: PipelineConfig::default(),
        }
    }

    /// Replace the Source Registry (order is priority order).
    pub fn with_registry(mut self, registry: Vec<ProviderSpec>) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the pipeline config.
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Run the full analysis for one product.
    ///
    /// Fatal failures (identification, main-product scoring) propagate as
    /// a single typed error. Categorizer or provider failures degrade the
    /// result: the report is still returned, possibly with empty
    /// `similar_products`.
    pub async fn analyze(&self, image: &ProductImage, price: f64) -> Result<ProductReport> {
        if !price.is_finite() || price <= 0.0 {
            return Err(EnrichmentError::InvalidPrice { price });
        }

        let analysis_id = Uuid::new_v4();
        info!(analysis_id = %analysis_id, price = price, "analysis starting");

        // the one call that is never skipped
        let identity = self.judge.identify(image).await?;
        info!(
            analysis_id = %analysis_id,
            name = %identity.name,
            brand = identity.brand.as_deref().unwrap_or(""),
            "product identified"
        );

        let mut fragment = aggregate(&self.fetcher, &self.registry, &identity.name).await;

        if !fragment.has_ingredients() {
            info!(analysis_id = %analysis_id, "no provider signal, falling back to vision guess");
            let guess = self.judge.guess_attributes(image).await?;
            for ingredient in guess.ingredients {
                fragment.push_ingredient(ingredient);
            }
            for material in guess.packaging_materials {
                fragment.push_material(material);
            }
            fragment.recyclable |= guess.recyclable;
        }

        // fatal for the main product: nothing downstream is meaningful
        // without a verdict
        let carbon_footprint = self
            .judge
            .score_footprint(
                &fragment.ingredients,
                &fragment.packaging_materials,
                fragment.recyclable,
            )
            .await?;

        let similar_products = match self.judge.categorize(&identity.name).await {
            Ok(profile) => {
                crate::candidates::find_candidates(
                    &self.fetcher,
                    &self.judge,
                    &self.registry,
                    price,
                    &profile,
                    &self.config,
                )
                .await
            }
            Err(e) => {
                warn!(analysis_id = %analysis_id, error = %e, "categorization failed, skipping similar products");
                Vec::new()
            }
        };

        info!(
            analysis_id = %analysis_id,
            ingredients = fragment.ingredients.len(),
            similar = similar_products.len(),
            score = carbon_footprint.score,
            "analysis complete"
        );

        Ok(ProductReport {
            analysis_id,
            name: identity.name,
            brand: identity.brand,
            ingredients: fragment.ingredients,
            packaging: PackagingInfo {
                materials: fragment.packaging_materials,
                recyclable: fragment.recyclable,
            },
            carbon_footprint,
            similar_products,
            analyzed_at: Utc::now(),
        })
    }
}
