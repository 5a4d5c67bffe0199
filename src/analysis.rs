//! Period aggregation over parsed sector rows, plus the per-period averages
//! and shares shown next to every total.

use serde::Serialize;

use crate::config::PeriodConfig;
use crate::data::model::{Headers, ParsedRow, ParsedTable};
use crate::period::{PerPeriod, PeriodBucket, PeriodClassifier, PeriodDurations};

// ---------------------------------------------------------------------------
// SectorBreakdown / AnalysisResult
// ---------------------------------------------------------------------------

/// Production of one sector split into the four periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorBreakdown {
    pub sector: String,
    /// Sum of the sector's hour columns per period.
    pub periods: PerPeriod<f64>,
    /// The row's own "Total" column when present and non-zero, otherwise the
    /// sum of `periods`. The two may differ when some columns are unclassified.
    pub total: f64,
}

impl SectorBreakdown {
    pub fn derived(&self, durations: &PeriodDurations) -> DerivedStats {
        derive_stats(self, durations)
    }
}

/// All sectors in input order, plus totals across sectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub sectors: Vec<SectorBreakdown>,
    pub totals: PerPeriod<f64>,
    pub grand_total: f64,
}

impl AnalysisResult {
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }
}

// ---------------------------------------------------------------------------
// ProductionAggregator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct ProductionAggregator {
    classifier: PeriodClassifier,
}

impl ProductionAggregator {
    pub fn new(classifier: PeriodClassifier) -> Self {
        ProductionAggregator { classifier }
    }

    pub fn from_config(config: &PeriodConfig) -> Self {
        Self::new(config.classifier())
    }

    /// Bucket for every numeric column, `None` for columns that are skipped.
    fn column_buckets(&self, headers: &Headers) -> Vec<(usize, PeriodBucket)> {
        headers
            .value_columns()
            .filter_map(|(i, header)| match self.classifier.classify(header) {
                Some(bucket) => Some((i, bucket)),
                None => {
                    log::debug!("Column '{header}' is not an hour column");
                    None
                }
            })
            .collect()
    }

    pub fn aggregate(&self, table: &ParsedTable) -> AnalysisResult {
        let columns = self.column_buckets(&table.headers);
        let total_column = table.headers.total_column();

        let mut result = AnalysisResult::default();
        for row in &table.rows {
            let breakdown = breakdown_row(row, &columns, total_column);
            for bucket in PeriodBucket::ALL {
                *result.totals.get_mut(bucket) += breakdown.periods.get(bucket);
            }
            result.grand_total += breakdown.total;
            result.sectors.push(breakdown);
        }
        result
    }
}

fn breakdown_row(
    row: &ParsedRow,
    columns: &[(usize, PeriodBucket)],
    total_column: Option<usize>,
) -> SectorBreakdown {
    let mut periods = PerPeriod::<f64>::default();
    for &(column, bucket) in columns {
        *periods.get_mut(bucket) += row.value(column).unwrap_or(0.0);
    }

    let total = total_column
        .and_then(|c| row.value(c))
        .filter(|v| *v != 0.0)
        .unwrap_or_else(|| periods.sum());

    SectorBreakdown {
        sector: row.name.clone(),
        periods,
        total,
    }
}

// ---------------------------------------------------------------------------
// DerivedStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedStats {
    /// Period total per hour of the period.
    pub average: PerPeriod<f64>,
    /// Period total as a fraction of the sector total.
    pub share: PerPeriod<f64>,
}

/// Averages and shares for one sector. Zero divisors give 0, never NaN.
pub fn derive_stats(breakdown: &SectorBreakdown, durations: &PeriodDurations) -> DerivedStats {
    let total = breakdown.total;
    DerivedStats {
        average: PerPeriod::from_fn(|b| ratio(*breakdown.periods.get(b), *durations.get(b))),
        share: PerPeriod::from_fn(|b| ratio(*breakdown.periods.get(b), total)),
    }
}

fn ratio(value: f64, divisor: f64) -> f64 {
    if divisor > 0.0 {
        value / divisor
    } else {
        0.0
    }
}
