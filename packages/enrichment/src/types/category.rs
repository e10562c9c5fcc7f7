//! Structured classification of a product.

use serde::{Deserialize, Serialize};

/// Category profile produced by the text capability for one product name.
///
/// Drives alternative-product search: `product_type` and `search_terms`
/// become provider queries, `key_characteristics` and `target_use` feed
/// the match filter, and `exclude_terms` veto categorically-adjacent but
/// functionally different products. Read-only after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryProfile {
    /// Broad category (e.g., "personal care")
    #[serde(default)]
    pub main_category: String,

    /// Narrower category (e.g., "hair care")
    #[serde(default)]
    pub sub_category: String,

    /// The product type used as the primary search query (e.g., "shampoo")
    #[serde(default)]
    pub product_type: String,

    /// What the product is for (e.g., "hair fall", "dry scalp")
    #[serde(default)]
    pub target_use: Vec<String>,

    /// Additional search-term variants to run per provider
    #[serde(default)]
    pub search_terms: Vec<String>,

    /// Terms that veto a candidate (e.g., "oil" when searching shampoos)
    #[serde(default)]
    pub exclude_terms: Vec<String>,

    /// Characteristics a genuine alternative should mention
    #[serde(default)]
    pub key_characteristics: Vec<String>,
}

impl CategoryProfile {
    /// Create a profile with just a product type.
    pub fn new(product_type: impl Into<String>) -> Self {
        Self {
            product_type: product_type.into(),
            ..Default::default()
        }
    }

    /// Set target uses.
    pub fn with_target_use(mut self, uses: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.target_use = uses.into_iter().map(Into::into).collect();
        self
    }

    /// Set search-term variants.
    pub fn with_search_terms(
        mut self,
        terms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.search_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Set exclusion terms.
    pub fn with_exclude_terms(
        mut self,
        terms: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.exclude_terms = terms.into_iter().map(Into::into).collect();
        self
    }

    /// Set key characteristics.
    pub fn with_key_characteristics(
        mut self,
        characteristics: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.key_characteristics = characteristics.into_iter().map(Into::into).collect();
        self
    }

    /// All queries to run against each provider: the product type first,
    /// then each search-term variant.
    pub fn queries(&self) -> Vec<&str> {
        let mut queries = vec![self.product_type.as_str()];
        queries.extend(self.search_terms.iter().map(String::as_str));
        queries
    }
}
