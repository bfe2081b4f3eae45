//! Chart rendering (enabled with the `charts` feature)
//!
//! Renders the four report charts to PNG files with `plotters`: the
//! power-duration curve, the substrate-by-zone stacked bars, the metabolic
//! fingerprint radar, and the fuel-usage-vs-power curve.

use plotters::prelude::*;
use std::path::Path;

use crate::config::CurveSettings;
use crate::curve::{sample_fuel_band, PowerDurationCurve};
use crate::error::{PerfError, Result};
use crate::models::MetricSummary;
use crate::zones::ZoneSubstrate;

const CHART_SIZE: (u32, u32) = (900, 600);

/// Axis labels and normalization bounds for the metabolic fingerprint.
/// Each metric is plotted as its fraction of the bound.
const FINGERPRINT_AXES: [(&str, f64); 6] = [
    ("VO2max", 85.0),
    ("CP", 400.0),
    ("W'", 30.0),
    ("VLamax", 1.0),
    ("FATmax", 250.0),
    ("Efficiency", 6.0),
];

/// Render the power-duration curve: model line, measured test points, and a
/// horizontal critical-power reference.
pub fn render_power_duration_chart(
    curve: &PowerDurationCurve,
    test_points: &[(u32, f64)],
    settings: &CurveSettings,
    path: &Path,
) -> Result<()> {
    let samples = curve.sample(
        settings.min_duration_secs,
        settings.max_duration_secs,
        settings.samples,
    )?;

    let y_max = samples
        .iter()
        .map(|p| p.power_watts)
        .chain(test_points.iter().map(|&(_, p)| p))
        .fold(0.0f64, f64::max)
        * 1.05;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(to_chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Power Duration Curve", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..settings.max_duration_secs, 0.0..y_max)
        .map_err(to_chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Duration (s)")
        .y_desc("Power (W)")
        .draw()
        .map_err(to_chart_error)?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|p| (p.duration_secs, p.power_watts)),
            &BLUE,
        ))
        .map_err(to_chart_error)?
        .label("Model fit")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .draw_series(
            test_points
                .iter()
                .map(|&(d, p)| Circle::new((d as f64, p), 4, RED.filled())),
        )
        .map_err(to_chart_error)?
        .label("Test data")
        .legend(|(x, y)| Circle::new((x + 10, y), 4, RED.filled()));

    chart
        .draw_series(LineSeries::new(
            [
                (0.0, curve.critical_power),
                (settings.max_duration_secs, curve.critical_power),
            ],
            &BLACK.mix(0.4),
        ))
        .map_err(to_chart_error)?
        .label("CP")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK.mix(0.4)));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(to_chart_error)?;

    root.present().map_err(to_chart_error)?;
    Ok(())
}

/// Render the substrate-by-zone table as stacked fat/carbohydrate bars.
pub fn render_substrate_chart(zones: &[ZoneSubstrate], path: &Path) -> Result<()> {
    if zones.is_empty() {
        return Err(PerfError::Chart("No zones to render".to_string()));
    }

    let labels: Vec<String> = zones.iter().map(|z| z.zone.clone()).collect();

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(to_chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Substrate Use by Training Zone (%CP)", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..zones.len() as f64, 0.0..120.0)
        .map_err(to_chart_error)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(zones.len())
        .x_label_formatter(&|x| {
            labels
                .get(x.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("Fuel Usage (%)")
        .draw()
        .map_err(to_chart_error)?;

    chart
        .draw_series(zones.iter().enumerate().map(|(i, z)| {
            let x0 = i as f64 + 0.15;
            let x1 = i as f64 + 0.85;
            Rectangle::new([(x0, 0.0), (x1, z.fuel.fat_percent as f64)], GREEN.filled())
        }))
        .map_err(to_chart_error)?
        .label("Fat (%)")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], GREEN.filled()));

    chart
        .draw_series(zones.iter().enumerate().map(|(i, z)| {
            let x0 = i as f64 + 0.15;
            let x1 = i as f64 + 0.85;
            Rectangle::new(
                [(x0, z.fuel.fat_percent as f64), (x1, 100.0)],
                RGBColor(255, 165, 0).filled(),
            )
        }))
        .map_err(to_chart_error)?
        .label("Carbohydrate (%)")
        .legend(|(x, y)| {
            Rectangle::new([(x, y - 5), (x + 10, y + 5)], RGBColor(255, 165, 0).filled())
        });

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(to_chart_error)?;

    root.present().map_err(to_chart_error)?;
    Ok(())
}

/// Render the six metrics as a radar polygon, each axis normalized against
/// its fingerprint bound.
pub fn render_metabolic_fingerprint(metrics: &MetricSummary, path: &Path) -> Result<()> {
    let values = [
        metrics.vo2max,
        metrics.critical_power,
        metrics.w_prime_kj,
        metrics.vlamax.value(),
        metrics.fatmax_watts,
        metrics.efficiency,
    ];
    let normalized: Vec<f64> = values
        .iter()
        .zip(FINGERPRINT_AXES.iter())
        .map(|(v, &(_, bound))| v / bound)
        .collect();

    // keep the unit ring and any over-unit metric inside the frame
    let reach = normalized.iter().fold(1.0f64, |acc, &v| acc.max(v)) * 1.35;

    let root = BitMapBackend::new(path, (600, 600)).into_drawing_area();
    root.fill(&WHITE).map_err(to_chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Metabolic Fingerprint", ("sans-serif", 28))
        .margin(20)
        .build_cartesian_2d(-reach..reach, -reach..reach)
        .map_err(to_chart_error)?;

    for (i, &(label, _)) in FINGERPRINT_AXES.iter().enumerate() {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, 0.0), spoke_vertex(i, 1.0)],
                &BLACK.mix(0.3),
            )))
            .map_err(to_chart_error)?;
        chart
            .draw_series(std::iter::once(Text::new(
                label,
                spoke_vertex(i, 1.12),
                ("sans-serif", 16),
            )))
            .map_err(to_chart_error)?;
    }

    let mut outline: Vec<(f64, f64)> = normalized
        .iter()
        .enumerate()
        .map(|(i, &r)| spoke_vertex(i, r))
        .collect();

    chart
        .draw_series(std::iter::once(Polygon::new(
            outline.clone(),
            &BLUE.mix(0.3),
        )))
        .map_err(to_chart_error)?;
    outline.push(outline[0]);
    chart
        .draw_series(std::iter::once(PathElement::new(
            outline,
            BLUE.stroke_width(2),
        )))
        .map_err(to_chart_error)?;

    root.present().map_err(to_chart_error)?;
    Ok(())
}

/// Vertex on the fingerprint's i-th spoke at radius `r`, first axis at
/// 12 o'clock, proceeding clockwise.
fn spoke_vertex(i: usize, r: f64) -> (f64, f64) {
    let step = std::f64::consts::TAU / FINGERPRINT_AXES.len() as f64;
    let angle = std::f64::consts::FRAC_PI_2 - step * i as f64;
    (r * angle.cos(), r * angle.sin())
}

/// Render fat and carbohydrate percentages across the standard 40%..140% CP
/// band, with vertical references at FATmax and CP.
pub fn render_fuel_curve_chart(metrics: &MetricSummary, path: &Path) -> Result<()> {
    let cp = metrics.critical_power;
    let points = sample_fuel_band(cp, 100)?;

    let x_min = points.first().map(|p| p.power_watts).unwrap_or(0.0);
    let x_max = points.last().map(|p| p.power_watts).unwrap_or(1.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(to_chart_error)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Fuel Substrate Shift with Power", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0.0..110.0)
        .map_err(to_chart_error)?;

    chart
        .configure_mesh()
        .x_desc("Power (W)")
        .y_desc("Fuel Usage (%)")
        .draw()
        .map_err(to_chart_error)?;

    chart
        .draw_series(LineSeries::new(
            points
                .iter()
                .map(|p| (p.power_watts, p.fuel.fat_percent as f64)),
            &GREEN,
        ))
        .map_err(to_chart_error)?
        .label("Fat (%)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREEN));

    chart
        .draw_series(LineSeries::new(
            points
                .iter()
                .map(|p| (p.power_watts, p.fuel.carb_percent as f64)),
            &RGBColor(255, 165, 0),
        ))
        .map_err(to_chart_error)?
        .label("Carbohydrate (%)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RGBColor(255, 165, 0)));

    chart
        .draw_series(LineSeries::new(
            [(metrics.fatmax_watts, 0.0), (metrics.fatmax_watts, 110.0)],
            &BLUE.mix(0.6),
        ))
        .map_err(to_chart_error)?
        .label("FATmax")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE.mix(0.6)));

    chart
        .draw_series(LineSeries::new([(cp, 0.0), (cp, 110.0)], &BLACK.mix(0.4)))
        .map_err(to_chart_error)?
        .label("CP")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLACK.mix(0.4)));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(to_chart_error)?;

    root.present().map_err(to_chart_error)?;
    Ok(())
}

fn to_chart_error<E: std::fmt::Display>(err: E) -> PerfError {
    PerfError::Chart(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MetricEngine;
    use crate::models::PowerProfile;
    use crate::zones::ZoneCalculator;
    use tempfile::TempDir;

    fn reference_metrics() -> MetricSummary {
        MetricEngine::analyze(&PowerProfile {
            p15s: 900.0,
            p1min: 600.0,
            p3min: 320.0,
            p5min: 300.0,
            p12min: 280.0,
            body_weight_kg: 70.0,
        })
    }

    #[test]
    fn test_render_power_duration_chart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pd_curve.png");

        let curve = PowerDurationCurve::from_tests(320.0, 280.0);
        let test_points = [(15, 900.0), (60, 600.0), (180, 320.0), (300, 300.0), (720, 280.0)];
        render_power_duration_chart(&curve, &test_points, &CurveSettings::default(), &path)
            .unwrap();

        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_render_substrate_chart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("substrate.png");

        let zones = ZoneCalculator::substrate_by_zone(266.667).unwrap();
        render_substrate_chart(&zones, &path).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_substrate_chart_rejects_empty_zones() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        assert!(render_substrate_chart(&[], &path).is_err());
    }

    #[test]
    fn test_render_metabolic_fingerprint() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fingerprint.png");

        render_metabolic_fingerprint(&reference_metrics(), &path).unwrap();

        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_spoke_vertices_start_at_top_and_stay_on_radius() {
        let (x, y) = spoke_vertex(0, 1.0);
        assert!(x.abs() < 1e-9);
        assert!((y - 1.0).abs() < 1e-9);

        for i in 0..FINGERPRINT_AXES.len() {
            let (x, y) = spoke_vertex(i, 0.75);
            assert!(((x * x + y * y).sqrt() - 0.75).abs() < 1e-9);
        }
    }

    #[test]
    fn test_render_fuel_curve_chart() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fuel_curve.png");

        render_fuel_curve_chart(&reference_metrics(), &path).unwrap();

        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_fuel_curve_chart_rejects_degenerate_cp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.png");

        let mut metrics = reference_metrics();
        metrics.critical_power = 0.0;
        assert!(render_fuel_curve_chart(&metrics, &path).is_err());
    }
}
