use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::period::{BoundaryTable, PeriodBucket, PeriodClassifier, PeriodDurations};

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{bucket} range {start}..={end} is not within 0..=23")]
    HourOutOfRange { bucket: PeriodBucket, start: u8, end: u8 },

    #[error("hour {hour} is claimed by both {first} and {second}")]
    OverlappingHour {
        hour: u8,
        first: PeriodBucket,
        second: PeriodBucket,
    },

    #[error("duration for {0} is not a finite number")]
    InvalidDuration(PeriodBucket),
}

// ---------------------------------------------------------------------------
// PeriodConfig – boundaries + durations under one version tag
// ---------------------------------------------------------------------------

/// Period rules in force for an analysis.
///
/// The rules changed several times (noon moved in and out of off-hours,
/// durations were re-measured), so they travel together under a version tag
/// and are handed to the pipeline explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodConfig {
    pub version: String,
    pub boundaries: BoundaryTable,
    pub durations: PeriodDurations,
}

impl PeriodConfig {
    pub fn current() -> Self {
        PeriodConfig {
            version: "2024.4".to_string(),
            boundaries: BoundaryTable::canonical(),
            durations: PeriodDurations::new(4.75, 4.0, 7.0, 7.61),
        }
    }

    pub fn legacy() -> Self {
        PeriodConfig {
            version: "2024.1".to_string(),
            boundaries: BoundaryTable::strict(),
            durations: PeriodDurations::new(4.0, 4.0, 5.0, 9.0),
        }
    }

    pub fn classifier(&self) -> PeriodClassifier {
        PeriodClassifier::new(self.boundaries.clone())
    }

    /// Reject hours outside the day, hours claimed twice, and non-finite durations.
    /// Zero or negative durations are allowed: their averages read as 0.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut owner: [Option<PeriodBucket>; 24] = [None; 24];
        for (bucket, ranges) in self.boundaries.claims() {
            for range in ranges {
                if range.0 > range.1 || range.1 > 23 {
                    return Err(ConfigError::HourOutOfRange {
                        bucket,
                        start: range.0,
                        end: range.1,
                    });
                }
                for hour in range.0..=range.1 {
                    if let Some(first) = owner[hour as usize] {
                        return Err(ConfigError::OverlappingHour {
                            hour,
                            first,
                            second: bucket,
                        });
                    }
                    owner[hour as usize] = Some(bucket);
                }
            }
        }
        for (bucket, duration) in self.durations.iter() {
            if !duration.is_finite() {
                return Err(ConfigError::InvalidDuration(bucket));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON config:
    ///
    /// ```json
    /// {
    ///   "version": "2024.4",
    ///   "boundaries": { "morning": [[7, 11]], "afternoon": [[13, 16]],
    ///                   "off_hours": [[12, 12], [17, 21], [2, 2]] },
    ///   "durations": { "morning": 4.75, "afternoon": 4, "off_hours": 7, "night": 7.61 }
    /// }
    /// ```
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: PeriodConfig = serde_json::from_str(text).context("parsing period config JSON")?;
        config
            .validate()
            .with_context(|| format!("invalid period config '{}'", config.version))?;
        Ok(config)
    }

    pub fn from_json_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading period config {}", path.display()))?;
        let config = Self::from_json_str(&text)?;
        log::info!("Loaded period config {} from {}", config.version, path.display());
        Ok(config)
    }
}

impl Default for PeriodConfig {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::HourRange;

    #[test]
    fn presets_are_valid() {
        assert_eq!(PeriodConfig::current().validate(), Ok(()));
        assert_eq!(PeriodConfig::legacy().validate(), Ok(()));
    }

    #[test]
    fn json_round_trips_through_presets() {
        let json = serde_json::to_string(&PeriodConfig::legacy()).unwrap();
        assert_eq!(PeriodConfig::from_json_str(&json).unwrap(), PeriodConfig::legacy());
    }

    #[test]
    fn overlapping_hours_are_rejected() {
        let mut config = PeriodConfig::current();
        config.boundaries.afternoon.push(HourRange(11, 11));
        assert_eq!(
            config.validate(),
            Err(ConfigError::OverlappingHour {
                hour: 11,
                first: PeriodBucket::Morning,
                second: PeriodBucket::Afternoon,
            })
        );
    }

    #[test]
    fn out_of_range_hours_are_rejected() {
        let mut config = PeriodConfig::current();
        config.boundaries.morning = vec![HourRange(7, 24)];
        assert!(matches!(config.validate(), Err(ConfigError::HourOutOfRange { .. })));
    }

    #[test]
    fn bad_json_reports_context() {
        let err = PeriodConfig::from_json_str("{ \"version\": 1 }").unwrap_err();
        assert!(format!("{err:#}").contains("parsing period config JSON"));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("periods.json");
        std::fs::write(&path, serde_json::to_string(&PeriodConfig::current()).unwrap()).unwrap();
        assert_eq!(PeriodConfig::from_json_path(&path).unwrap(), PeriodConfig::current());
    }
}
