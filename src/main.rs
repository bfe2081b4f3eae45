use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use tracing::info;

use perfrs::config::AppConfig;
use perfrs::curve::{sample_fuel_band, PowerDurationCurve};
use perfrs::logging::{self, LogLevel};
use perfrs::models::PowerProfile;
use perfrs::report::PerformanceReport;
use perfrs::zones::ZoneCalculator;

/// perfrs - Cycling Performance Report CLI
///
/// Computes physiological metrics (VO2max, critical power, W', VLamax,
/// FATmax, efficiency) from a handful of power-test results and renders
/// text reports, JSON, and charts.
#[derive(Parser)]
#[command(name = "perfrs")]
#[command(version = "0.1.0")]
#[command(about = "Cycling performance report generator", long_about = None)]
struct Cli {
    /// Sets a custom config file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase verbosity of output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// The six power-test inputs shared by all subcommands.
#[derive(Args)]
struct ProfileArgs {
    /// 15-second peak power (W)
    #[arg(long, default_value = "900")]
    p15s: f64,

    /// 1-minute average power (W)
    #[arg(long, default_value = "600")]
    p1min: f64,

    /// 3-minute average power (W)
    #[arg(long, default_value = "320")]
    p3min: f64,

    /// 5-minute average power (W)
    #[arg(long, default_value = "300")]
    p5min: f64,

    /// 12-minute average power (W)
    #[arg(long, default_value = "280")]
    p12min: f64,

    /// Body weight (kg); falls back to the configured default
    #[arg(short, long)]
    weight: Option<f64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the full performance report
    Report {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Athlete name to print on the report
        #[arg(short, long)]
        athlete: Option<String>,

        /// Emit JSON instead of a text report
        #[arg(long)]
        json: bool,

        /// Directory to write chart PNGs into (requires the charts feature)
        #[arg(long, value_name = "DIR")]
        chart_dir: Option<PathBuf>,
    },

    /// Print sampled points of the power-duration curve
    Curve {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Print the substrate-use-by-zone table
    Zones {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Print the fat/carbohydrate split across a power range
    Fuel {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Number of sampled powers across the 40%..140% CP band
        #[arg(long, default_value = "14")]
        samples: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_or_default(cli.config.as_deref())?;

    let mut log_config = config.logging.clone();
    if cli.verbose > 0 {
        log_config.level = LogLevel::from_verbosity(cli.verbose);
    }
    logging::init_logging(&log_config)?;

    match cli.command {
        Commands::Report {
            profile,
            athlete,
            json,
            chart_dir,
        } => {
            let profile = build_profile(&profile, &config)?;
            let report = PerformanceReport::generate(profile, athlete)?;
            info!(
                cp = report.metrics.critical_power,
                vo2max = report.metrics.vo2max,
                "report generated"
            );

            if json {
                println!("{}", report.to_json()?);
            } else {
                println!("{}", report.to_text());
            }

            if let Some(dir) = chart_dir {
                render_charts(&report, &config, &dir)?;
            }
        }

        Commands::Curve { profile } => {
            let profile = build_profile(&profile, &config)?;
            let curve = PowerDurationCurve::from_tests(profile.p3min, profile.p12min);
            let points = curve.sample(
                config.curve.min_duration_secs,
                config.curve.max_duration_secs,
                config.curve.samples,
            )?;

            println!("{}", "Power Duration Curve".blue().bold());
            println!(
                "  CP: {:.1} W, W': {:.1} kJ",
                curve.critical_power, curve.w_prime_kj
            );
            for point in points {
                println!("  {:>6.0} s  {:>6.1} W", point.duration_secs, point.power_watts);
            }
        }

        Commands::Zones { profile } => {
            let profile = build_profile(&profile, &config)?;
            let curve = PowerDurationCurve::from_tests(profile.p3min, profile.p12min);
            let zones = ZoneCalculator::substrate_by_zone(curve.critical_power)?;

            println!("{}", "Substrate Use by Training Zone".blue().bold());
            for zone in zones {
                println!(
                    "  {}  {:>4} W  fat {:>3}%  carb {:>3}%",
                    zone.zone, zone.power_watts, zone.fuel.fat_percent, zone.fuel.carb_percent
                );
            }
        }

        Commands::Fuel { profile, samples } => {
            let profile = build_profile(&profile, &config)?;
            let curve = PowerDurationCurve::from_tests(profile.p3min, profile.p12min);
            let points = sample_fuel_band(curve.critical_power, samples)?;

            println!("{}", "Fuel Split vs Power".blue().bold());
            for point in points {
                println!(
                    "  {:>6.0} W  fat {:>3}%  carb {:>3}%",
                    point.power_watts, point.fuel.fat_percent, point.fuel.carb_percent
                );
            }
        }
    }

    Ok(())
}

fn build_profile(args: &ProfileArgs, config: &AppConfig) -> Result<PowerProfile> {
    let profile = PowerProfile {
        p15s: args.p15s,
        p1min: args.p1min,
        p3min: args.p3min,
        p5min: args.p5min,
        p12min: args.p12min,
        body_weight_kg: args.weight.unwrap_or(config.default_body_weight_kg),
    };
    profile.validate()?;
    Ok(profile)
}

#[cfg(feature = "charts")]
fn render_charts(
    report: &PerformanceReport,
    config: &AppConfig,
    dir: &std::path::Path,
) -> Result<()> {
    use perfrs::chart;

    std::fs::create_dir_all(dir)?;
    let curve = PowerDurationCurve {
        critical_power: report.metrics.critical_power,
        w_prime_kj: report.metrics.w_prime_kj,
    };

    let pd_path = dir.join("power_duration_curve.png");
    chart::render_power_duration_chart(
        &curve,
        &report.profile.test_points(),
        &config.curve,
        &pd_path,
    )?;
    println!("{} {:?}", "Wrote".green(), pd_path);

    let substrate_path = dir.join("substrate_by_zone.png");
    chart::render_substrate_chart(&report.zones, &substrate_path)?;
    println!("{} {:?}", "Wrote".green(), substrate_path);

    let fingerprint_path = dir.join("metabolic_fingerprint.png");
    chart::render_metabolic_fingerprint(&report.metrics, &fingerprint_path)?;
    println!("{} {:?}", "Wrote".green(), fingerprint_path);

    let fuel_path = dir.join("fuel_curve.png");
    chart::render_fuel_curve_chart(&report.metrics, &fuel_path)?;
    println!("{} {:?}", "Wrote".green(), fuel_path);

    Ok(())
}

#[cfg(not(feature = "charts"))]
fn render_charts(
    _report: &PerformanceReport,
    _config: &AppConfig,
    _dir: &std::path::Path,
) -> Result<()> {
    anyhow::bail!("Chart output requires building with the 'charts' feature")
}
