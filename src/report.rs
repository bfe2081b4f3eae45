//! Performance report assembly and rendering
//!
//! Bundles a power profile, its derived metrics, and the substrate-by-zone
//! table into a single report that renders as colored terminal text or JSON.

use chrono::NaiveDate;
use colored::*;
use serde::{Deserialize, Serialize};
use tabled::{settings::Style, Table, Tabled};

use crate::engine::MetricEngine;
use crate::error::{PerfError, Result};
use crate::models::{MetricSummary, PowerProfile};
use crate::zones::{ZoneCalculator, ZoneSubstrate};

/// Complete performance report for one athlete and one set of tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Athlete name, if provided
    pub athlete_name: Option<String>,

    /// Date the report was generated
    pub generated_on: NaiveDate,

    /// Input power-test values
    pub profile: PowerProfile,

    /// Derived physiological metrics
    pub metrics: MetricSummary,

    /// Estimated substrate use per training zone
    pub zones: Vec<ZoneSubstrate>,
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Metric")]
    name: String,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Tabled)]
struct ZoneRow {
    #[tabled(rename = "Zone")]
    zone: String,
    #[tabled(rename = "%CP")]
    pct_cp: String,
    #[tabled(rename = "Power (W)")]
    power: u16,
    #[tabled(rename = "Fat (%)")]
    fat: u8,
    #[tabled(rename = "Carb (%)")]
    carb: u8,
}

impl PerformanceReport {
    /// Compute the full report from a validated power profile.
    pub fn generate(profile: PowerProfile, athlete_name: Option<String>) -> Result<Self> {
        profile.validate()?;

        let metrics = MetricEngine::analyze(&profile);
        let zones = ZoneCalculator::substrate_by_zone(metrics.critical_power)
            .map_err(|e| PerfError::Report(e.to_string()))?;

        Ok(Self {
            athlete_name,
            generated_on: chrono::Local::now().date_naive(),
            profile,
            metrics,
            zones,
        })
    }

    /// Render the report as colored terminal text.
    ///
    /// Decimal precision follows the conventional presentation: one decimal
    /// for power and VO2max, two for VLamax and efficiency, whole watts for
    /// FATmax.
    pub fn to_text(&self) -> String {
        let mut out = String::new();

        let title = match &self.athlete_name {
            Some(name) => format!("Performance Report: {}", name),
            None => "Performance Report".to_string(),
        };
        out.push_str(&format!(
            "{} ({})\n\n",
            title.green().bold(),
            self.generated_on
        ));

        let m = &self.metrics;
        let rows = vec![
            MetricRow {
                name: "VO2max".to_string(),
                value: format!("{:.1} ml/kg/min", m.vo2max),
            },
            MetricRow {
                name: "Critical Power (CP)".to_string(),
                value: format!("{:.1} W", m.critical_power),
            },
            MetricRow {
                name: "W' (Anaerobic Work Capacity)".to_string(),
                value: format!("{:.1} kJ", m.w_prime_kj),
            },
            MetricRow {
                name: "VLamax (Estimate)".to_string(),
                value: format!("{:.2} mmol/l/s", m.vlamax.value()),
            },
            MetricRow {
                name: "FATmax Estimate".to_string(),
                value: format!("{:.0} W", m.fatmax_watts),
            },
            MetricRow {
                name: "Efficiency (CP / VO2max)".to_string(),
                value: format!("{:.2} W / L O2", m.efficiency),
            },
        ];
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        out.push_str(&table.to_string());
        out.push('\n');

        out.push_str(&format!(
            "\n{}\n",
            "Substrate Use by Training Zone".blue().bold()
        ));
        let zone_rows: Vec<ZoneRow> = self
            .zones
            .iter()
            .map(|z| ZoneRow {
                zone: z.zone.clone(),
                pct_cp: format!("{}", z.pct_cp),
                power: z.power_watts,
                fat: z.fuel.fat_percent,
                carb: z.fuel.carb_percent,
            })
            .collect();
        let mut zone_table = Table::new(zone_rows);
        zone_table.with(Style::rounded());
        out.push_str(&zone_table.to_string());
        out.push('\n');

        out
    }

    /// Render the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| PerfError::Report(e.to_string()))
    }
}
