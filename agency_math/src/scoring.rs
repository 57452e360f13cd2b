//! Composite pipeline score
//!
//! A weighted 0-5 ranking number for speculative projects, blending win
//! likelihood, expected margin, reputation, export orientation and deal size.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Top of the score scale; every component is normalized to 0..=5
pub const SCORE_SCALE: f64 = 5.0;

/// Expected margin (in percent) that maps to a full margin component
pub const MARGIN_CEILING_PCT: f64 = 50.0;

/// Weights and normalization for the composite pipeline score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub likelihood: f64,
    pub margin: f64,
    pub reputation: f64,
    pub exports: f64,
    pub value: f64,
    /// Contract value at which the value component saturates
    pub value_normalization: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            likelihood: 0.35,
            margin: 0.25,
            reputation: 0.20,
            exports: 0.10,
            value: 0.10,
            value_normalization: 150_000.0,
        }
    }
}

impl ScoreWeights {
    /// Check that all weights are non-negative and the normalization is positive
    pub fn validate(&self) -> Result<()> {
        let weights = [
            ("likelihood", self.likelihood),
            ("margin", self.margin),
            ("reputation", self.reputation),
            ("exports", self.exports),
            ("value", self.value),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(MathError::InvalidInput(format!(
                    "{} weight must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        if !self.value_normalization.is_finite() || self.value_normalization <= 0.0 {
            return Err(MathError::InvalidInput(format!(
                "value normalization must be positive, got {}",
                self.value_normalization
            )));
        }

        Ok(())
    }
}

/// Project attributes that feed the composite score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub likelihood_pct: f64,
    pub expected_margin_pct: f64,
    pub reputation_score: f64,
    pub exports_oriented: bool,
    pub contract_value: f64,
}

/// Deal-size component, saturating at [`SCORE_SCALE`]
pub fn value_score(contract_value: f64, value_normalization: f64) -> f64 {
    (contract_value / value_normalization * SCORE_SCALE).min(SCORE_SCALE)
}

/// Compute the composite pipeline score.
///
/// Negative expected margins are clamped to zero and never pull the score down.
///
/// # Examples
///
/// ```
/// use agency_math::scoring::{composite_score, ScoreInputs, ScoreWeights};
///
/// let inputs = ScoreInputs {
///     likelihood_pct: 100.0,
///     expected_margin_pct: 50.0,
///     reputation_score: 5.0,
///     exports_oriented: true,
///     contract_value: 150_000.0,
/// };
/// let score = composite_score(&inputs, &ScoreWeights::default());
/// assert!((score - 5.0).abs() < 1e-9);
/// ```
pub fn composite_score(inputs: &ScoreInputs, weights: &ScoreWeights) -> f64 {
    let likelihood = inputs.likelihood_pct / 100.0 * SCORE_SCALE;
    let margin = inputs.expected_margin_pct.max(0.0) / MARGIN_CEILING_PCT * SCORE_SCALE;
    let exports = if inputs.exports_oriented { 5.0 } else { 2.0 };
    let value = value_score(inputs.contract_value, weights.value_normalization);

    likelihood * weights.likelihood
        + margin * weights.margin
        + inputs.reputation_score * weights.reputation
        + exports * weights.exports
        + value * weights.value
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eu_barometer() -> ScoreInputs {
        ScoreInputs {
            likelihood_pct: 75.0,
            expected_margin_pct: 22.0,
            reputation_score: 5.0,
            exports_oriented: true,
            contract_value: 120_000.0,
        }
    }

    #[test]
    fn test_composite_score() {
        // 0.35*3.75 + 0.25*2.2 + 0.20*5 + 0.10*5 + 0.10*4
        let score = composite_score(&eu_barometer(), &ScoreWeights::default());
        assert_relative_eq!(score, 3.7625, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_margin_is_clamped() {
        let mut inputs = eu_barometer();
        inputs.expected_margin_pct = -30.0;
        let clamped = composite_score(&inputs, &ScoreWeights::default());

        inputs.expected_margin_pct = 0.0;
        let zero = composite_score(&inputs, &ScoreWeights::default());
        assert_eq!(clamped, zero);
    }

    #[test]
    fn test_value_score_saturates() {
        assert_relative_eq!(value_score(75_000.0, 150_000.0), 2.5);
        assert_eq!(value_score(150_000.0, 150_000.0), 5.0);
        assert_eq!(value_score(900_000.0, 150_000.0), 5.0);
    }

    #[test]
    fn test_domestic_projects_get_lower_exports_component() {
        let mut inputs = eu_barometer();
        let exports = composite_score(&inputs, &ScoreWeights::default());
        inputs.exports_oriented = false;
        let domestic = composite_score(&inputs, &ScoreWeights::default());
        assert_relative_eq!(exports - domestic, 0.3, epsilon = 1e-9);
    }

    #[test]
    fn test_weights_validation() {
        assert!(ScoreWeights::default().validate().is_ok());

        let negative = ScoreWeights {
            margin: -0.1,
            ..ScoreWeights::default()
        };
        assert!(negative.validate().is_err());

        let zero_norm = ScoreWeights {
            value_normalization: 0.0,
            ..ScoreWeights::default()
        };
        assert!(zero_norm.validate().is_err());
    }
}
