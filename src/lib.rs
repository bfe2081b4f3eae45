// Library interface for perfrs modules
// This allows integration tests to access the core functionality

pub mod config;
pub mod curve;
pub mod engine;
pub mod error;
pub mod logging;
pub mod models;
pub mod report;
pub mod zones;

#[cfg(feature = "charts")]
pub mod chart;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CurveSettings};
pub use curve::{CurvePoint, FuelPoint, PowerDurationCurve};
pub use engine::{MetricEngine, VlamaxEstimate};
pub use error::{PerfError, Result};
pub use logging::{LogConfig, LogFormat, LogLevel};
pub use models::{FuelSplit, MetricSummary, PowerProfile};
pub use report::PerformanceReport;
pub use zones::{ZoneCalculator, ZoneSubstrate};
