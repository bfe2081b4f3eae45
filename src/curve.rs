//! Power-duration curve modeling and sampling
//!
//! The hyperbolic two-parameter model predicts sustainable power for a given
//! duration as `P(t) = W' / t + CP`. This module evaluates that model and
//! samples it (plus the fuel-split step function) over ranges suitable for
//! charting.

use serde::{Deserialize, Serialize};

use crate::engine::MetricEngine;
use crate::error::{CalculationError, Result};
use crate::models::FuelSplit;

/// One sampled point on the power-duration curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub duration_secs: f64,
    pub power_watts: f64,
}

/// One sampled point of the fuel-split curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FuelPoint {
    pub power_watts: f64,
    pub fuel: FuelSplit,
}

/// Fitted two-parameter power-duration model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerDurationCurve {
    /// Critical power in watts
    pub critical_power: f64,
    /// W' in kilojoules
    pub w_prime_kj: f64,
}

impl PowerDurationCurve {
    /// Build the curve from 3-minute and 12-minute test powers.
    pub fn from_tests(power_3min: f64, power_12min: f64) -> Self {
        let (critical_power, w_prime_kj) = MetricEngine::critical_power(power_3min, power_12min);
        Self {
            critical_power,
            w_prime_kj,
        }
    }

    /// Predicted sustainable power for a duration: `W'/t + CP`.
    ///
    /// Approaches CP asymptotically for long durations; a zero duration
    /// yields a non-finite value.
    pub fn power_at(&self, duration_secs: f64) -> f64 {
        self.w_prime_kj * 1000.0 / duration_secs + self.critical_power
    }

    /// Sample the curve at `samples` evenly spaced durations across
    /// `[min_secs, max_secs]`, endpoints included.
    pub fn sample(&self, min_secs: f64, max_secs: f64, samples: usize) -> Result<Vec<CurvePoint>> {
        check_range("power_duration_curve", min_secs, max_secs, samples)?;

        let step = (max_secs - min_secs) / (samples - 1) as f64;
        let points = (0..samples)
            .map(|i| {
                let duration_secs = min_secs + step * i as f64;
                CurvePoint {
                    duration_secs,
                    power_watts: self.power_at(duration_secs),
                }
            })
            .collect();
        Ok(points)
    }
}

/// Fuel-curve sampling band, as fractions of critical power.
pub const FUEL_BAND_MIN_PCT_CP: f64 = 0.4;
pub const FUEL_BAND_MAX_PCT_CP: f64 = 1.4;

/// Sample the fat/carbohydrate split at evenly spaced powers across
/// `[min_watts, max_watts]`, endpoints included.
///
/// Unlike the raw [`MetricEngine::fuel_split`] formula, sampling is a
/// boundary operation and rejects a degenerate critical power instead of
/// producing a flat all-carbohydrate curve.
pub fn sample_fuel(
    critical_power: f64,
    min_watts: f64,
    max_watts: f64,
    samples: usize,
) -> Result<Vec<FuelPoint>> {
    if !critical_power.is_finite() || critical_power <= 0.0 {
        return Err(CalculationError::DivisionByZero {
            calculation: "fuel_split_curve".to_string(),
        }
        .into());
    }
    check_range("fuel_split_curve", min_watts, max_watts, samples)?;

    let step = (max_watts - min_watts) / (samples - 1) as f64;
    let points = (0..samples)
        .map(|i| {
            let power_watts = min_watts + step * i as f64;
            FuelPoint {
                power_watts,
                fuel: MetricEngine::fuel_split(power_watts, critical_power),
            }
        })
        .collect();
    Ok(points)
}

/// Sample the fuel split across the standard band, 40% to 140% of CP.
pub fn sample_fuel_band(critical_power: f64, samples: usize) -> Result<Vec<FuelPoint>> {
    sample_fuel(
        critical_power,
        FUEL_BAND_MIN_PCT_CP * critical_power,
        FUEL_BAND_MAX_PCT_CP * critical_power,
        samples,
    )
}

fn check_range(calculation: &str, min: f64, max: f64, samples: usize) -> Result<()> {
    if samples < 2 {
        return Err(CalculationError::InvalidRange {
            calculation: calculation.to_string(),
            reason: format!("need at least 2 samples, got {}", samples),
        }
        .into());
    }
    if !(min.is_finite() && max.is_finite()) || min >= max {
        return Err(CalculationError::InvalidRange {
            calculation: calculation.to_string(),
            reason: format!("invalid bounds [{}, {}]", min, max),
        }
        .into());
    }
    Ok(())
}
