//! Alternative-product candidates.

use serde::{Deserialize, Serialize};

/// A comparable alternative product surfaced by the Candidate Finder.
///
/// Identity key is `canonical_link` (absolute URL): a result set holds at
/// most one candidate per canonical link. Enrichment fields
/// (`ingredients`, `packaging`, `eco_score`) are attached after ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProduct {
    pub name: String,

    #[serde(default)]
    pub brand: String,

    pub price: f64,

    #[serde(default)]
    pub image_url: String,

    /// Absolute URL; the identity key within a result set.
    pub canonical_link: String,

    /// Host of the provider the candidate came from.
    #[serde(default)]
    pub source_host: String,

    #[serde(default)]
    pub description: String,

    /// Attached by per-candidate enrichment.
    #[serde(default)]
    pub ingredients: Vec<String>,

    /// Attached by per-candidate enrichment.
    #[serde(default)]
    pub packaging: PackagingInfo,

    /// Composite footprint score; `None` when per-candidate scoring was
    /// skipped or failed.
    #[serde(default)]
    pub eco_score: Option<f64>,
}

/// Packaging evidence attached to a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PackagingInfo {
    #[serde(default)]
    pub materials: Vec<String>,

    #[serde(default)]
    pub recyclable: bool,
}

/// A raw result item extracted from one provider page, before price and
/// characteristic filtering decide whether it becomes a candidate.
#[derive(Debug, Clone)]
pub struct ResultItem {
    pub name: String,
    pub brand: String,
    /// Absent when the provider showed no parseable price.
    pub price: Option<f64>,
    pub image_url: String,
    /// Possibly relative; resolved against the provider page URL later.
    pub link: String,
    pub description: String,
    /// Provider the item was extracted from.
    pub provider: String,
}
