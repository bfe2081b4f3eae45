//! Performance metric engine
//!
//! Closed-form estimators that turn a small set of power-test results into
//! physiological metrics: VO2max, critical power and W', FATmax, VLamax,
//! gross efficiency, and the fat/carbohydrate substrate split.
//!
//! All functions here are pure and total over f64 inputs. Degenerate inputs
//! (zero body weight, zero 1-minute power, zero critical power) propagate as
//! non-finite values rather than errors; input validation belongs to the
//! caller (see [`crate::models::PowerProfile::validate`]). The one in-formula
//! guard is [`MetricEngine::efficiency`], which substitutes a divisor of 1
//! when VO2max is non-positive.

use serde::{Deserialize, Serialize};

use crate::models::{FuelSplit, MetricSummary, PowerProfile};

/// Test durations anchoring the two-point critical power solve, in seconds.
pub const CP_SHORT_TEST_SECS: f64 = 180.0;
pub const CP_LONG_TEST_SECS: f64 = 720.0;

/// VO2max estimation coefficient for 5-minute power (ml O2 per watt-minute).
const VO2MAX_COEFFICIENT: f64 = 10.8;

/// FATmax as a fixed fraction of 5-minute power.
const FATMAX_RATIO: f64 = 0.55;

/// Sprint-to-sustained power ratio thresholds for VLamax, tested in order.
/// A ratio above the bound maps to the paired value; below all bounds the
/// estimate floors at 0.4 mmol/l/s.
const VLAMAX_TABLE: [(f64, f64); 3] = [(1.8, 0.7), (1.6, 0.6), (1.4, 0.5)];
const VLAMAX_FLOOR: f64 = 0.4;

/// Fat percentage bands over %CP, tested in order. The first band whose
/// upper bound contains the ratio wins; above 100% CP fat contribution is
/// taken as zero.
const FUEL_TABLE: [(f64, u8); 5] = [
    (0.55, 85),
    (0.65, 70),
    (0.75, 50),
    (0.85, 30),
    (1.00, 15),
];

/// VLamax categorical estimate in mmol/l/s.
///
/// The estimate is a discretized proxy derived from the ratio of 15-second
/// peak power to 1-minute power, not a measured lactate value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VlamaxEstimate(pub f64);

impl VlamaxEstimate {
    pub fn value(&self) -> f64 {
        self.0
    }
}

/// Stateless calculator for all performance metrics.
pub struct MetricEngine;

impl MetricEngine {
    /// Estimate VO2max (ml/kg/min) from 5-minute power and body weight.
    ///
    /// Uses the relationship VO2max = P5 * 10.8 / weight. A zero weight
    /// yields a non-finite result.
    pub fn vo2max(power_5min: f64, body_weight_kg: f64) -> f64 {
        power_5min * VO2MAX_COEFFICIENT / body_weight_kg
    }

    /// Solve the two-parameter critical power model from 3-minute and
    /// 12-minute test powers.
    ///
    /// This is an exact linear solve of `t = W' / (P - CP)` through the two
    /// duration anchors (180 s, 720 s), not a least-squares fit. Returns
    /// `(critical_power_watts, w_prime_kj)`. When both test powers are equal
    /// the line is flat: CP equals that power and W' is zero.
    pub fn critical_power(power_3min: f64, power_12min: f64) -> (f64, f64) {
        let cp = (power_3min * CP_SHORT_TEST_SECS - power_12min * CP_LONG_TEST_SECS)
            / (CP_SHORT_TEST_SECS - CP_LONG_TEST_SECS);
        let w_prime_kj = CP_SHORT_TEST_SECS * (power_3min - cp) / 1000.0;
        (cp, w_prime_kj)
    }

    /// Estimate the FATmax power (W) as a fixed fraction of 5-minute power.
    ///
    /// Rounds half away from zero: a product landing exactly on .5 in f64
    /// (e.g. 310 * 0.55 == 170.5) rounds up, not to even.
    pub fn fatmax(power_5min: f64) -> f64 {
        (power_5min * FATMAX_RATIO).round()
    }

    /// Estimate VLamax (mmol/l/s) from the sprint-to-sustained power ratio.
    ///
    /// Returns one of {0.4, 0.5, 0.6, 0.7}. A zero 1-minute power makes the
    /// ratio non-finite; a NaN ratio fails every threshold and floors at 0.4.
    pub fn vlamax(power_15s: f64, power_1min: f64) -> VlamaxEstimate {
        let ratio = power_15s / power_1min;
        for &(bound, value) in &VLAMAX_TABLE {
            if ratio > bound {
                return VlamaxEstimate(value);
            }
        }
        VlamaxEstimate(VLAMAX_FLOOR)
    }

    /// Gross efficiency proxy: critical power per litre of oxygen (W / L O2).
    ///
    /// Guards the division: a non-positive VO2max is replaced by 1, so the
    /// result falls back to the critical power itself.
    pub fn efficiency(critical_power: f64, vo2max: f64) -> f64 {
        let divisor = if vo2max > 0.0 { vo2max } else { 1.0 };
        critical_power / divisor
    }

    /// Fat/carbohydrate split at a given power, relative to critical power.
    ///
    /// Step function over %CP with six bands; the two percentages always sum
    /// to exactly 100. A zero critical power makes the ratio non-finite, in
    /// which case every band is missed and the split is all-carbohydrate.
    pub fn fuel_split(power: f64, critical_power: f64) -> FuelSplit {
        let pct_cp = power / critical_power;
        let fat = FUEL_TABLE
            .iter()
            .find(|&&(bound, _)| pct_cp <= bound)
            .map(|&(_, fat)| fat)
            .unwrap_or(0);
        FuelSplit::from_fat(fat)
    }

    /// Run the full metric set over a power profile.
    pub fn analyze(profile: &PowerProfile) -> MetricSummary {
        let vo2max = Self::vo2max(profile.p5min, profile.body_weight_kg);
        let (critical_power, w_prime_kj) = Self::critical_power(profile.p3min, profile.p12min);
        MetricSummary {
            vo2max,
            critical_power,
            w_prime_kj,
            vlamax: Self::vlamax(profile.p15s, profile.p1min),
            fatmax_watts: Self::fatmax(profile.p5min),
            efficiency: Self::efficiency(critical_power, vo2max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vo2max_reference_athlete() {
        let vo2max = MetricEngine::vo2max(300.0, 70.0);
        assert!((vo2max - 46.2857).abs() < 1e-3);
    }

    #[test]
    fn test_vo2max_zero_weight_propagates_non_finite() {
        assert!(!MetricEngine::vo2max(300.0, 0.0).is_finite());
    }

    #[test]
    fn test_critical_power_two_point_solve() {
        let (cp, w_prime) = MetricEngine::critical_power(320.0, 280.0);
        assert!((cp - 266.6667).abs() < 1e-3);
        assert!((w_prime - 9.6).abs() < 1e-3);
    }

    #[test]
    fn test_critical_power_flat_profile() {
        // Equal test powers collapse the model: CP is that power, W' is zero
        let (cp, w_prime) = MetricEngine::critical_power(250.0, 250.0);
        assert_eq!(cp, 250.0);
        assert_eq!(w_prime, 0.0);
    }

    #[test]
    fn test_fatmax_rounds_to_whole_watts() {
        assert_eq!(MetricEngine::fatmax(300.0), 165.0);
        assert_eq!(MetricEngine::fatmax(301.0), 166.0); // 165.55 rounds up
    }

    #[test]
    fn test_fatmax_half_ties_round_away_from_zero() {
        // 310 * 0.55 is exactly 170.5 in f64
        assert_eq!(MetricEngine::fatmax(310.0), 171.0);
    }

    #[test]
    fn test_vlamax_bands() {
        assert_eq!(MetricEngine::vlamax(900.0, 600.0).value(), 0.5); // ratio 1.5
        assert_eq!(MetricEngine::vlamax(1100.0, 600.0).value(), 0.7); // ratio ~1.83
        assert_eq!(MetricEngine::vlamax(1000.0, 600.0).value(), 0.6); // ratio ~1.67
        assert_eq!(MetricEngine::vlamax(700.0, 600.0).value(), 0.4); // ratio ~1.17
    }

    #[test]
    fn test_vlamax_boundary_ratios_fall_to_lower_band() {
        // Thresholds are strict: a ratio exactly at a bound takes the band below
        assert_eq!(MetricEngine::vlamax(1.8, 1.0).value(), 0.6);
        assert_eq!(MetricEngine::vlamax(1.6, 1.0).value(), 0.5);
        assert_eq!(MetricEngine::vlamax(1.4, 1.0).value(), 0.4);
    }

    #[test]
    fn test_efficiency_guard_path() {
        assert_eq!(MetricEngine::efficiency(267.0, 0.0), 267.0);
        assert_eq!(MetricEngine::efficiency(267.0, -5.0), 267.0);
    }

    #[test]
    fn test_efficiency_normal_path() {
        let eff = MetricEngine::efficiency(266.67, 46.29);
        assert!((eff - 5.76).abs() < 0.01);
    }

    #[test]
    fn test_fuel_split_bands() {
        let cp = 267.0;
        assert_eq!(MetricEngine::fuel_split(100.0, cp).fat_percent, 85);
        assert_eq!(MetricEngine::fuel_split(160.0, cp).fat_percent, 70); // ~0.60
        assert_eq!(MetricEngine::fuel_split(200.0, cp).fat_percent, 50); // ~0.749
        assert_eq!(MetricEngine::fuel_split(220.0, cp).fat_percent, 30); // ~0.82
        assert_eq!(MetricEngine::fuel_split(260.0, cp).fat_percent, 15); // ~0.97
        assert_eq!(MetricEngine::fuel_split(300.0, cp).fat_percent, 0); // >1.0
    }

    #[test]
    fn test_fuel_split_sums_to_100() {
        let cp = 267.0;
        for power in (0..500).map(|p| p as f64) {
            let split = MetricEngine::fuel_split(power, cp);
            assert_eq!(split.fat_percent as u16 + split.carb_percent as u16, 100);
        }
    }

    #[test]
    fn test_fuel_split_zero_cp_is_all_carbohydrate() {
        let split = MetricEngine::fuel_split(200.0, 0.0);
        assert_eq!(split.fat_percent, 0);
        assert_eq!(split.carb_percent, 100);
    }

    #[test]
    fn test_analyze_reference_profile() {
        let profile = PowerProfile {
            p15s: 900.0,
            p1min: 600.0,
            p3min: 320.0,
            p5min: 300.0,
            p12min: 280.0,
            body_weight_kg: 70.0,
        };
        let summary = MetricEngine::analyze(&profile);

        assert!((summary.vo2max - 46.2857).abs() < 1e-3);
        assert!((summary.critical_power - 266.6667).abs() < 1e-3);
        assert!((summary.w_prime_kj - 9.6).abs() < 1e-3);
        assert_eq!(summary.vlamax.value(), 0.5);
        assert_eq!(summary.fatmax_watts, 165.0);
        assert!((summary.efficiency - summary.critical_power / summary.vo2max).abs() < 1e-9);
    }
}
