//! # Agency Math
//!
//! Pure formulas behind the agency analytics.
//! This crate provides the calendar-month arithmetic used by the revenue
//! forecast, the project margin formula and the composite pipeline score.

use thiserror::Error;

pub mod calendar;
pub mod margin;
pub mod scoring;

pub use calendar::{add_months, parse_iso_date, YearMonth};
pub use margin::{compute_margin, margin_pct, MarginBreakdown};
pub use scoring::{composite_score, ScoreWeights};

/// Errors that can occur in agency math operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid month {0}: months are numbered 1 through 12")]
    InvalidMonth(u32),
}

/// Result type for agency math operations
pub type Result<T> = std::result::Result<T, MathError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = MathError::InvalidMonth(13);
        assert!(err.to_string().contains("13"));

        let err = MathError::InvalidInput("negative normalization".to_string());
        assert_eq!(err.to_string(), "Invalid input: negative normalization");
    }
}
