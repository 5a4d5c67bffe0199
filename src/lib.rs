//! Hourly production per sector, pasted as an HTML table, broken down into
//! four day periods (morning, afternoon, off-hours, night).
//!
//! ```no_run
//! use sector_periods::{extract, PeriodConfig};
//!
//! # fn main() -> Result<(), sector_periods::ExtractError> {
//! let html = std::fs::read_to_string("paste.html").unwrap_or_default();
//! let extraction = extract(&html, &PeriodConfig::current())?;
//! for row in extraction.report_rows() {
//!     println!("{}: {:?}", row.sector, row.formatted());
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod format;
pub mod period;
pub mod pipeline;
pub mod report;
pub mod state;

pub use analysis::{derive_stats, AnalysisResult, DerivedStats, ProductionAggregator, SectorBreakdown};
pub use config::PeriodConfig;
pub use error::ExtractError;
pub use period::{BoundaryTable, PerPeriod, PeriodBucket, PeriodClassifier, PeriodDurations};
pub use pipeline::{extract, inspect_paste, Extraction, PasteState};
pub use state::Session;
