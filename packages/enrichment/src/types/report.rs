//! Caller-facing analysis results and judgment input/output shapes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::candidate::{CandidateProduct, PackagingInfo};
use super::footprint::FootprintResult;

/// The image handed to the vision capability.
///
/// The core receives an already-resolved image; upload and storage are an
/// external collaborator's responsibility.
#[derive(Debug, Clone)]
pub enum ProductImage {
    /// Raw bytes plus MIME type (e.g., "image/jpeg")
    Bytes { data: Vec<u8>, mime: String },

    /// An already-hosted, fetchable URL
    Url(String),
}

impl ProductImage {
    /// Convenience constructor for JPEG bytes.
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self::Bytes {
            data,
            mime: "image/jpeg".to_string(),
        }
    }

    /// Convenience constructor for a hosted URL.
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url(url.into())
    }
}

/// Best-guess identity from the vision capability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductIdentity {
    pub name: String,

    #[serde(default)]
    pub brand: Option<String>,
}

/// Fallback ingredient/packaging guess from the vision capability, used
/// when no provider yielded any ingredient signal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeGuess {
    #[serde(default)]
    pub ingredients: Vec<String>,

    #[serde(default)]
    pub packaging_materials: Vec<String>,

    #[serde(default)]
    pub recyclable: bool,
}

/// The complete analysis result returned to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReport {
    /// Correlation id for this analysis run.
    pub analysis_id: Uuid,

    pub name: String,

    #[serde(default)]
    pub brand: Option<String>,

    pub ingredients: Vec<String>,

    pub packaging: PackagingInfo,

    pub carbon_footprint: FootprintResult,

    /// Ranked alternatives; legitimately empty when the Categorizer or
    /// all providers fail.
    #[serde(default)]
    pub similar_products: Vec<CandidateProduct>,

    pub analyzed_at: DateTime<Utc>,
}
