//! Chart-ready data. Rendering belongs to whoever consumes these structs.

use std::sync::OnceLock;

use palette::Srgb;
use regex::Regex;

use crate::analysis::{derive_stats, SectorBreakdown};
use crate::color::{period_color, series_colors};
use crate::data::model::ParsedTable;
use crate::period::{extract_hour, BoundaryTable, PeriodBucket, PeriodDurations};

// ---------------------------------------------------------------------------
// Production bar chart – every sector, one bar segment per period
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PeriodDataset {
    pub bucket: PeriodBucket,
    pub color: Srgb<u8>,
    /// One value per sector, in sector order.
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductionChart {
    pub labels: Vec<String>,
    pub datasets: Vec<PeriodDataset>,
}

pub fn production_chart(sectors: &[SectorBreakdown]) -> ProductionChart {
    ProductionChart {
        labels: sectors.iter().map(|s| s.sector.clone()).collect(),
        datasets: PeriodBucket::ALL
            .into_iter()
            .map(|bucket| PeriodDataset {
                bucket,
                color: period_color(bucket),
                values: sectors.iter().map(|s| *s.periods.get(bucket)).collect(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Overview pie – one sector
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub bucket: PeriodBucket,
    pub color: Srgb<u8>,
    pub value: f64,
    pub share: f64,
    /// Hourly average for the legend.
    pub average: f64,
}

pub fn overview_pie(sector: &SectorBreakdown, durations: &PeriodDurations) -> Vec<PieSlice> {
    let stats = derive_stats(sector, durations);
    PeriodBucket::ALL
        .into_iter()
        .map(|bucket| PieSlice {
            bucket,
            color: period_color(bucket),
            value: *sector.periods.get(bucket),
            share: *stats.share.get(bucket),
            average: *stats.average.get(bucket),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hourly line chart – selected sectors over the hour columns
// ---------------------------------------------------------------------------

fn hour_label() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)[0-9]+h").expect("Hardcode regex pattern"))
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    pub sector: String,
    pub color: Srgb<u8>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyChart {
    /// Header labels that look like hours ("7h", "13H"), in table order.
    pub labels: Vec<String>,
    /// Period band colour under each label; `None` for hours past 23.
    pub bands: Vec<Option<Srgb<u8>>>,
    pub series: Vec<HourlySeries>,
}

/// Unknown sector names produce a flat series of zeros.
pub fn hourly_chart(table: &ParsedTable, boundaries: &BoundaryTable, selected: &[&str]) -> HourlyChart {
    let columns: Vec<(usize, &str)> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| hour_label().is_match(h))
        .collect();

    let bands = columns
        .iter()
        .map(|(_, label)| extract_hour(label).map(|h| period_color(boundaries.bucket_for_hour(h))))
        .collect();

    let series = selected
        .iter()
        .zip(series_colors(selected.len()))
        .map(|(name, color)| {
            let row = table.row_by_name(name);
            if row.is_none() {
                log::debug!("Hourly chart: no row named '{name}'");
            }
            HourlySeries {
                sector: name.to_string(),
                color,
                values: columns
                    .iter()
                    .map(|(i, _)| row.and_then(|r| r.value(*i)).unwrap_or(0.0))
                    .collect(),
            }
        })
        .collect();

    HourlyChart {
        labels: columns.iter().map(|(_, label)| label.to_string()).collect(),
        bands,
        series,
    }
}
