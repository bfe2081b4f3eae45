//! Substrate use by training zone
//!
//! Maps the seven classic cycling training zones onto fixed %CP anchors and
//! estimates the fat/carbohydrate split at each zone's representative power.

use anyhow::{anyhow, Result};
use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::engine::MetricEngine;
use crate::models::FuelSplit;

/// Representative %CP anchor for each training zone Z1..Z7.
const ZONE_CP_RATIOS: [(&str, Decimal); 7] = [
    ("Z1", dec!(0.50)),
    ("Z2", dec!(0.65)),
    ("Z3", dec!(0.75)),
    ("Z4", dec!(0.90)),
    ("Z5", dec!(1.10)),
    ("Z6", dec!(1.35)),
    ("Z7", dec!(1.70)),
];

/// Errors that can occur during zone calculations
#[derive(Debug, thiserror::Error)]
pub enum ZoneError {
    #[error("Invalid threshold value: {0}")]
    InvalidThreshold(String),
    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Estimated substrate use for one training zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSubstrate {
    /// Zone label (Z1..Z7)
    pub zone: String,

    /// Zone anchor as a fraction of critical power
    pub pct_cp: Decimal,

    /// Representative power for the zone, rounded to whole watts
    pub power_watts: u16,

    /// Fat/carbohydrate split at that power
    pub fuel: FuelSplit,
}

/// Zone calculation utilities
pub struct ZoneCalculator;

impl ZoneCalculator {
    /// Build the substrate-by-zone table for a given critical power.
    ///
    /// Zone powers are `round(cp * ratio)` in whole watts; the fuel split at
    /// each rounded power comes from [`MetricEngine::fuel_split`].
    pub fn substrate_by_zone(critical_power: f64) -> Result<Vec<ZoneSubstrate>> {
        Self::validate_critical_power(critical_power)?;

        let cp = Decimal::from_f64(critical_power).ok_or_else(|| {
            ZoneError::CalculationError("Critical power is not representable".to_string())
        })?;

        ZONE_CP_RATIOS
            .iter()
            .map(|&(zone, ratio)| {
                let power_watts = Self::zone_power(cp, ratio)?;
                Ok(ZoneSubstrate {
                    zone: zone.to_string(),
                    pct_cp: ratio,
                    power_watts,
                    fuel: MetricEngine::fuel_split(power_watts as f64, critical_power),
                })
            })
            .collect()
    }

    fn zone_power(cp: Decimal, ratio: Decimal) -> Result<u16> {
        let rounded = (cp * ratio).round();
        if rounded < Decimal::ZERO {
            return Err(anyhow!(ZoneError::CalculationError(
                "Negative zone power".to_string()
            )));
        }
        rounded
            .to_u16()
            .ok_or_else(|| anyhow!(ZoneError::CalculationError(
                "Zone power exceeds u16 range".to_string()
            )))
    }

    fn validate_critical_power(critical_power: f64) -> Result<()> {
        if !critical_power.is_finite() || critical_power <= 0.0 {
            return Err(anyhow!(ZoneError::InvalidThreshold(format!(
                "Critical power must be positive and finite, got {}",
                critical_power
            ))));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substrate_table_shape() {
        let zones = ZoneCalculator::substrate_by_zone(266.667).unwrap();
        assert_eq!(zones.len(), 7);
        assert_eq!(zones[0].zone, "Z1");
        assert_eq!(zones[6].zone, "Z7");
    }

    #[test]
    fn test_zone_powers_round_from_cp() {
        let zones = ZoneCalculator::substrate_by_zone(266.667).unwrap();
        assert_eq!(zones[0].power_watts, 133); // 0.50 * 266.667
        assert_eq!(zones[3].power_watts, 240); // 0.90 * 266.667
        assert_eq!(zones[6].power_watts, 453); // 1.70 * 266.667
    }

    #[test]
    fn test_fuel_shifts_to_carbohydrate_up_the_zones() {
        let zones = ZoneCalculator::substrate_by_zone(266.667).unwrap();
        let fats: Vec<u8> = zones.iter().map(|z| z.fuel.fat_percent).collect();
        assert!(fats.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(fats[0], 85); // Z1 sits in the lowest band
        assert_eq!(fats[6], 0); // Z7 is far above CP
        for zone in &zones {
            assert_eq!(zone.fuel.fat_percent as u16 + zone.fuel.carb_percent as u16, 100);
        }
    }

    #[test]
    fn test_rejects_degenerate_critical_power() {
        assert!(ZoneCalculator::substrate_by_zone(0.0).is_err());
        assert!(ZoneCalculator::substrate_by_zone(-100.0).is_err());
        assert!(ZoneCalculator::substrate_by_zone(f64::NAN).is_err());
    }
}
