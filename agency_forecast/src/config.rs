//! Analytics configuration
//!
//! Every field has a default, so a JSON file only needs the values it overrides.

use crate::error::{ForecastError, Result};
use agency_math::ScoreWeights;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Allocation thresholds (in percent) for classifying staff utilization
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilizationThresholds {
    /// Totals above this are over-allocated
    pub full: f64,
    pub well_utilized: f64,
    pub moderate: f64,
}

impl Default for UtilizationThresholds {
    fn default() -> Self {
        Self {
            full: 100.0,
            well_utilized: 80.0,
            moderate: 50.0,
        }
    }
}

/// Settings for forecast, pipeline and utilization reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    pub score_weights: ScoreWeights,
    pub default_horizon_months: usize,
    pub utilization: UtilizationThresholds,
    /// Projected director load (in percent) that reports flag as stretched
    pub director_capacity_warning: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            score_weights: ScoreWeights::default(),
            default_horizon_months: 12,
            utilization: UtilizationThresholds::default(),
            director_capacity_warning: 85.0,
        }
    }
}

impl AnalyticsConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: AnalyticsConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.score_weights.validate()?;

        if self.default_horizon_months == 0 {
            return Err(ForecastError::ValidationError(
                "default_horizon_months must be at least 1".to_string(),
            ));
        }

        let t = &self.utilization;
        if !(0.0 < t.moderate && t.moderate <= t.well_utilized && t.well_utilized <= t.full) {
            return Err(ForecastError::ValidationError(format!(
                "utilization thresholds must satisfy 0 < moderate <= well_utilized <= full, got {} / {} / {}",
                t.moderate, t.well_utilized, t.full
            )));
        }

        if self.director_capacity_warning <= 0.0 {
            return Err(ForecastError::ValidationError(
                "director_capacity_warning must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = AnalyticsConfig::from_json_str(
            r#"{ "default_horizon_months": 18, "score_weights": { "value_normalization": 200000 } }"#,
        )
        .unwrap();

        assert_eq!(config.default_horizon_months, 18);
        assert_eq!(config.score_weights.value_normalization, 200_000.0);
        assert_eq!(config.score_weights.likelihood, 0.35);
        assert_eq!(config.utilization, UtilizationThresholds::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(AnalyticsConfig::from_json_str(r#"{ "default_horizon_months": 0 }"#).is_err());
        assert!(AnalyticsConfig::from_json_str(
            r#"{ "utilization": { "moderate": 90, "well_utilized": 80 } }"#
        )
        .is_err());
        assert!(matches!(
            AnalyticsConfig::from_json_str(r#"{ "score_weights": { "exports": -1 } }"#),
            Err(ForecastError::MathError(_))
        ));
        assert!(matches!(
            AnalyticsConfig::from_json_str("not json"),
            Err(ForecastError::JsonError(_))
        ));
    }

    #[test]
    fn test_default_round_trip() {
        let config = AnalyticsConfig::default();
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(AnalyticsConfig::from_json_str(&text).unwrap(), config);
    }
}
