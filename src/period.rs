use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::data::model::TOTAL_LABEL;

// ---------------------------------------------------------------------------
// PeriodBucket – the four fixed day periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeriodBucket {
    Morning,
    Afternoon,
    OffHours,
    Night,
}

impl PeriodBucket {
    /// Display and export order.
    pub const ALL: [PeriodBucket; 4] = [
        PeriodBucket::Morning,
        PeriodBucket::Afternoon,
        PeriodBucket::OffHours,
        PeriodBucket::Night,
    ];

    /// Short label used in column headers ("Manhã Total", "Fora %").
    pub fn label(self) -> &'static str {
        match self {
            PeriodBucket::Morning => "Manhã",
            PeriodBucket::Afternoon => "Tarde",
            PeriodBucket::OffHours => "Fora",
            PeriodBucket::Night => "Noite",
        }
    }

    /// Long label used in chart legends.
    pub fn title(self) -> &'static str {
        match self {
            PeriodBucket::Morning => "Manhã",
            PeriodBucket::Afternoon => "Tarde",
            PeriodBucket::OffHours => "Fora do Horário",
            PeriodBucket::Night => "Noite",
        }
    }
}

impl fmt::Display for PeriodBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

// ---------------------------------------------------------------------------
// PerPeriod – one value per bucket
// ---------------------------------------------------------------------------

/// One `T` per [`PeriodBucket`]. Used for totals, durations, averages and shares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerPeriod<T> {
    pub morning: T,
    pub afternoon: T,
    pub off_hours: T,
    pub night: T,
}

impl<T> PerPeriod<T> {
    pub fn new(morning: T, afternoon: T, off_hours: T, night: T) -> Self {
        PerPeriod {
            morning,
            afternoon,
            off_hours,
            night,
        }
    }

    pub fn get(&self, bucket: PeriodBucket) -> &T {
        match bucket {
            PeriodBucket::Morning => &self.morning,
            PeriodBucket::Afternoon => &self.afternoon,
            PeriodBucket::OffHours => &self.off_hours,
            PeriodBucket::Night => &self.night,
        }
    }

    pub fn get_mut(&mut self, bucket: PeriodBucket) -> &mut T {
        match bucket {
            PeriodBucket::Morning => &mut self.morning,
            PeriodBucket::Afternoon => &mut self.afternoon,
            PeriodBucket::OffHours => &mut self.off_hours,
            PeriodBucket::Night => &mut self.night,
        }
    }

    /// Build each bucket's value from a function of the bucket.
    pub fn from_fn(mut f: impl FnMut(PeriodBucket) -> T) -> Self {
        PerPeriod::new(
            f(PeriodBucket::Morning),
            f(PeriodBucket::Afternoon),
            f(PeriodBucket::OffHours),
            f(PeriodBucket::Night),
        )
    }

    /// `(bucket, value)` pairs in [`PeriodBucket::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (PeriodBucket, &T)> {
        PeriodBucket::ALL.into_iter().map(move |b| (b, self.get(b)))
    }
}

impl PerPeriod<f64> {
    pub fn sum(&self) -> f64 {
        self.morning + self.afternoon + self.off_hours + self.night
    }
}

/// Hours covered by each period; divisor of the per-period average.
pub type PeriodDurations = PerPeriod<f64>;

// ---------------------------------------------------------------------------
// BoundaryTable – which hours belong to which period
// ---------------------------------------------------------------------------

/// Inclusive hour range, serialized as `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourRange(pub u8, pub u8);

impl HourRange {
    pub fn contains(self, hour: u8) -> bool {
        (self.0..=self.1).contains(&hour)
    }
}

/// Hour ranges for the three explicit periods. Every hour not claimed here
/// falls into [`PeriodBucket::Night`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundaryTable {
    pub morning: Vec<HourRange>,
    pub afternoon: Vec<HourRange>,
    pub off_hours: Vec<HourRange>,
}

impl BoundaryTable {
    /// Current rule: noon and 2h count as off-hours.
    pub fn canonical() -> Self {
        BoundaryTable {
            morning: vec![HourRange(7, 11)],
            afternoon: vec![HourRange(13, 16)],
            off_hours: vec![HourRange(12, 12), HourRange(17, 21), HourRange(2, 2)],
        }
    }

    /// Earlier rule: noon is not off-hours (it falls through to night).
    pub fn strict() -> Self {
        BoundaryTable {
            morning: vec![HourRange(7, 11)],
            afternoon: vec![HourRange(13, 16)],
            off_hours: vec![HourRange(17, 21), HourRange(2, 2)],
        }
    }

    /// Explicitly claimed ranges, checked in this order.
    pub fn claims(&self) -> [(PeriodBucket, &[HourRange]); 3] {
        [
            (PeriodBucket::Morning, self.morning.as_slice()),
            (PeriodBucket::Afternoon, self.afternoon.as_slice()),
            (PeriodBucket::OffHours, self.off_hours.as_slice()),
        ]
    }

    pub fn bucket_for_hour(&self, hour: u8) -> PeriodBucket {
        self.claims()
            .into_iter()
            .find(|(_, ranges)| ranges.iter().any(|r| r.contains(hour)))
            .map(|(bucket, _)| bucket)
            .unwrap_or(PeriodBucket::Night)
    }
}

impl Default for BoundaryTable {
    fn default() -> Self {
        Self::canonical()
    }
}

// ---------------------------------------------------------------------------
// PeriodClassifier – header label → bucket
// ---------------------------------------------------------------------------

/// Column names containing any of these are never hour columns.
const EXCLUDED_COLUMNS: &[&str] = &[crate::data::locator::SECTOR_MARKER, TOTAL_LABEL];

fn first_digits() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[0-9]+").expect("Hardcode regex pattern"))
}

/// First run of ASCII digits in `label` as an hour of day (0..=23).
pub fn extract_hour(label: &str) -> Option<u8> {
    let digits = first_digits().find(label)?;
    digits.as_str().parse::<u8>().ok().filter(|h| *h <= 23)
}

/// Maps hourly column labels ("7h", "22h") to period buckets.
#[derive(Debug, Clone, Default)]
pub struct PeriodClassifier {
    boundaries: BoundaryTable,
}

impl PeriodClassifier {
    pub fn new(boundaries: BoundaryTable) -> Self {
        PeriodClassifier { boundaries }
    }

    pub fn boundaries(&self) -> &BoundaryTable {
        &self.boundaries
    }

    /// Bucket of a column, or `None` when the column is not an hour column:
    /// no digits, an hour past 23, or a name containing "setor"/"total".
    pub fn classify(&self, header: &str) -> Option<PeriodBucket> {
        let lower = header.to_lowercase();
        if EXCLUDED_COLUMNS.iter().any(|ex| lower.contains(ex)) {
            return None;
        }
        extract_hour(header).map(|hour| self.boundaries.bucket_for_hour(hour))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_boundaries() {
        let table = BoundaryTable::canonical();
        assert_eq!(table.bucket_for_hour(7), PeriodBucket::Morning);
        assert_eq!(table.bucket_for_hour(11), PeriodBucket::Morning);
        assert_eq!(table.bucket_for_hour(13), PeriodBucket::Afternoon);
        assert_eq!(table.bucket_for_hour(12), PeriodBucket::OffHours);
        assert_eq!(table.bucket_for_hour(2), PeriodBucket::OffHours);
        assert_eq!(table.bucket_for_hour(21), PeriodBucket::OffHours);
        assert_eq!(table.bucket_for_hour(0), PeriodBucket::Night);
        assert_eq!(table.bucket_for_hour(22), PeriodBucket::Night);
        assert_eq!(table.bucket_for_hour(6), PeriodBucket::Night);
    }

    #[test]
    fn strict_boundaries_leave_noon_to_night() {
        assert_eq!(BoundaryTable::strict().bucket_for_hour(12), PeriodBucket::Night);
    }

    #[test]
    fn every_hour_lands_in_exactly_one_bucket() {
        let table = BoundaryTable::canonical();
        for hour in 0..24u8 {
            let claimed = table
                .claims()
                .iter()
                .filter(|(_, ranges)| ranges.iter().any(|r| r.contains(hour)))
                .count();
            assert!(claimed <= 1, "hour {hour} claimed {claimed} times");
        }
    }

    #[test]
    fn classify_headers() {
        let c = PeriodClassifier::default();
        assert_eq!(c.classify("7h"), Some(PeriodBucket::Morning));
        assert_eq!(c.classify("13:00"), Some(PeriodBucket::Afternoon));
        assert_eq!(c.classify("00h"), Some(PeriodBucket::Night));
        assert_eq!(c.classify("Setor"), None);
        assert_eq!(c.classify("Total"), None);
        assert_eq!(c.classify("Total 7h"), None);
        assert_eq!(c.classify("Subtotal 8h"), None);
        assert_eq!(c.classify("Obs"), None);
        assert_eq!(c.classify("25h"), None);
        assert_eq!(c.classify("99999999999h"), None);
    }

    #[test]
    fn per_period_iterates_in_display_order() {
        let p = PerPeriod::new(1.0, 2.0, 3.0, 4.0);
        let buckets: Vec<PeriodBucket> = p.iter().map(|(b, _)| b).collect();
        assert_eq!(buckets, PeriodBucket::ALL.to_vec());
        assert_eq!(p.sum(), 10.0);
        assert_eq!(*p.get(PeriodBucket::OffHours), 3.0);
    }
}
