use serde::{Deserialize, Serialize};

use crate::engine::VlamaxEstimate;
use crate::error::{PerfError, Result};

/// Standard test durations, in seconds, matched pairwise with the powers of
/// a [`PowerProfile`]. Used to anchor the power-duration curve.
pub const TEST_DURATIONS_SECS: [u32; 5] = [15, 60, 180, 300, 720];

/// Power-test results for a single athlete.
///
/// All powers are average watts over the named duration except `p15s`, which
/// is the 15-second peak. The profile is a transient value record: no
/// identity, no history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerProfile {
    /// 15-second peak power in watts
    pub p15s: f64,

    /// 1-minute average power in watts
    pub p1min: f64,

    /// 3-minute average power in watts
    pub p3min: f64,

    /// 5-minute average power in watts
    pub p5min: f64,

    /// 12-minute average power in watts
    pub p12min: f64,

    /// Body weight in kilograms
    pub body_weight_kg: f64,
}

impl PowerProfile {
    /// Test powers paired with their durations, ordered short to long.
    pub fn test_points(&self) -> [(u32, f64); 5] {
        [
            (TEST_DURATIONS_SECS[0], self.p15s),
            (TEST_DURATIONS_SECS[1], self.p1min),
            (TEST_DURATIONS_SECS[2], self.p3min),
            (TEST_DURATIONS_SECS[3], self.p5min),
            (TEST_DURATIONS_SECS[4], self.p12min),
        ]
    }

    /// Boundary validation: every field must be finite and positive.
    ///
    /// The metric formulas themselves never validate (degenerate inputs
    /// propagate as non-finite values), so anything that accepts user input
    /// calls this first.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("p15s", self.p15s),
            ("p1min", self.p1min),
            ("p3min", self.p3min),
            ("p5min", self.p5min),
            ("p12min", self.p12min),
            ("body_weight_kg", self.body_weight_kg),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(PerfError::Validation(format!(
                    "{} must be a positive finite number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Derived physiological metrics for one power profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricSummary {
    /// Maximal oxygen uptake in ml/kg/min
    pub vo2max: f64,

    /// Critical power in watts
    pub critical_power: f64,

    /// Anaerobic work capacity W' in kilojoules
    pub w_prime_kj: f64,

    /// Maximal lactate production rate proxy in mmol/l/s
    pub vlamax: VlamaxEstimate,

    /// Power at estimated peak fat oxidation, in watts
    pub fatmax_watts: f64,

    /// Critical power per litre of oxygen (W / L O2)
    pub efficiency: f64,
}

/// Fat/carbohydrate energy split at a given intensity.
///
/// The two percentages sum to exactly 100 for every input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelSplit {
    /// Share of energy from fat oxidation (0-100)
    pub fat_percent: u8,

    /// Share of energy from carbohydrate (0-100)
    pub carb_percent: u8,
}

impl FuelSplit {
    /// Build a split from the fat share; carbohydrate takes the remainder.
    pub fn from_fat(fat_percent: u8) -> Self {
        debug_assert!(fat_percent <= 100);
        Self {
            fat_percent,
            carb_percent: 100 - fat_percent,
        }
    }
}
