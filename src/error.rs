//! Unified error hierarchy for perfrs
//!
//! The metric formulas themselves are total over f64 and never return errors;
//! these types cover the boundary concerns: input validation, curve sampling,
//! and report/chart rendering. Configuration IO goes through `anyhow` at the
//! binary boundary.

use thiserror::Error;

/// Top-level error type for all perfrs operations
#[derive(Debug, Error)]
pub enum PerfError {
    /// Input validation errors (non-finite or non-positive test values)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Calculation boundary errors
    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    /// Report rendering errors
    #[error("Report error: {0}")]
    Report(String),

    /// Chart rendering errors
    #[error("Chart error: {0}")]
    Chart(String),
}

/// Calculation boundary errors
#[derive(Debug, Error)]
pub enum CalculationError {
    /// Degenerate divisor caught before sampling a curve
    #[error("Division by zero in {calculation}")]
    DivisionByZero { calculation: String },

    /// Curve sampling request that cannot be satisfied
    #[error("Invalid sample range for {calculation}: {reason}")]
    InvalidRange { calculation: String, reason: String },
}

/// Result type alias for perfrs operations
pub type Result<T> = std::result::Result<T, PerfError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_message() {
        let err = PerfError::Validation("p5min must be positive".to_string());
        assert!(err.to_string().contains("p5min"));
    }

    #[test]
    fn test_calculation_error_wraps_into_top_level() {
        let err: PerfError = CalculationError::DivisionByZero {
            calculation: "fuel_split_curve".to_string(),
        }
        .into();
        assert!(err.to_string().contains("fuel_split_curve"));
    }
}
