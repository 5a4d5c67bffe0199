use serde::Serialize;

use crate::analysis::{derive_stats, SectorBreakdown};
use crate::format::{format_number, format_percent};
use crate::period::{PerPeriod, PeriodBucket, PeriodDurations};

/// Total, hourly average and share of one period for one sector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodFigures {
    pub total: f64,
    pub average: f64,
    pub share: f64,
}

/// One line of the sector table and of the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub sector: String,
    pub total: f64,
    pub periods: PerPeriod<PeriodFigures>,
}

impl ReportRow {
    pub fn new(breakdown: &SectorBreakdown, durations: &PeriodDurations) -> Self {
        let stats = derive_stats(breakdown, durations);
        ReportRow {
            sector: breakdown.sector.clone(),
            total: breakdown.total,
            periods: PerPeriod::from_fn(|b| PeriodFigures {
                total: *breakdown.periods.get(b),
                average: *stats.average.get(b),
                share: *stats.share.get(b),
            }),
        }
    }

    /// Column labels matching [`ReportRow::values`] and [`ReportRow::formatted`].
    pub fn headers() -> Vec<String> {
        let mut headers = vec!["Setor".to_string(), "Total (m²)".to_string()];
        for bucket in PeriodBucket::ALL {
            let label = bucket.label();
            headers.push(format!("{label} Total"));
            headers.push(format!("{label} Média"));
            headers.push(format!("{label} %"));
        }
        headers
    }

    /// Raw numbers, sector total first, then total/average/share per period.
    pub fn values(&self) -> Vec<f64> {
        let mut values = vec![self.total];
        for (_, figures) in self.periods.iter() {
            values.extend([figures.total, figures.average, figures.share]);
        }
        values
    }

    /// Display strings for the on-screen sector table.
    pub fn formatted(&self) -> Vec<String> {
        let mut cells = vec![self.sector.clone(), format_number(self.total)];
        for (_, figures) in self.periods.iter() {
            cells.push(format_number(figures.total));
            cells.push(format_number(figures.average));
            cells.push(format_percent(figures.share));
        }
        cells
    }
}

pub fn report_rows(sectors: &[SectorBreakdown], durations: &PeriodDurations) -> Vec<ReportRow> {
    sectors.iter().map(|s| ReportRow::new(s, durations)).collect()
}
