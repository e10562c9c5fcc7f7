//! Carbon-footprint verdicts from the scoring capability.

use serde::{Deserialize, Serialize};

/// A 0-100 composite environmental-impact rating with four sub-scores.
///
/// Immutable once produced; owned by whichever entity (main product or
/// candidate) requested it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FootprintResult {
    /// Composite score, 0 (worst) to 100 (best)
    pub score: f64,

    /// Per-dimension sub-scores
    pub details: FootprintDetails,

    /// Optional human-readable explanation from the scoring model
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_explanation: Option<String>,
}

/// The four named sub-scores, each 0-100.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FootprintDetails {
    #[serde(default)]
    pub manufacturing: f64,
    #[serde(default)]
    pub transportation: f64,
    #[serde(default)]
    pub packaging: f64,
    #[serde(default)]
    pub lifecycle: f64,
}

impl FootprintResult {
    /// Create a result with all scores clamped into the 0-100 range.
    pub fn new(score: f64, details: FootprintDetails) -> Self {
        Self {
            score: score.clamp(0.0, 100.0),
            details: FootprintDetails {
                manufacturing: details.manufacturing.clamp(0.0, 100.0),
                transportation: details.transportation.clamp(0.0, 100.0),
                packaging: details.packaging.clamp(0.0, 100.0),
                lifecycle: details.lifecycle.clamp(0.0, 100.0),
            },
            overall_explanation: None,
        }
    }

    /// Attach an explanation.
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.overall_explanation = Some(explanation.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scores_clamped() {
        let result = FootprintResult::new(
            120.0,
            FootprintDetails {
                manufacturing: -5.0,
                transportation: 50.0,
                packaging: 101.0,
                lifecycle: 0.0,
            },
        );

        assert_eq!(result.score, 100.0);
        assert_eq!(result.details.manufacturing, 0.0);
        assert_eq!(result.details.packaging, 100.0);
        assert_eq!(result.details.transportation, 50.0);
    }
}
