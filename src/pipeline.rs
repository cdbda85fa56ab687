//! Pipeline orchestration
//!
//! The public entry points for sleepfeat: take one user's timeline, compute
//! the configured features, and hand back the augmented table. Each feature
//! append is a pure function of the timeline; the drop pass for rows lacking
//! trailing history runs once, after every append.

use std::fs::File;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::contiguity::{detect_runs, run_ids};
use crate::counters;
use crate::error::FeatureError;
use crate::table::{read_csv_path, FeatureTable};
use crate::timeline::Timeline;
use crate::window;

/// Which features to compute for one invocation.
///
/// Every flag independently enables one component; window widths are minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Night-time flag from hour of day
    pub nighttime: bool,
    /// Weekday flag from day of week
    pub weekday: bool,
    /// Daily step total, turning over at 04:00
    pub activity: bool,
    /// Minutes of sleep in the past 24 hours, strictly before each row
    pub previous_sleep: bool,
    /// Trailing heart-rate mean/sd, one pair of columns per window width
    pub historical_hr_windows: Vec<usize>,
    /// Trailing step sum window width, if requested
    pub historical_step_window: Option<usize>,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            nighttime: false,
            weekday: false,
            activity: false,
            previous_sleep: false,
            historical_hr_windows: Vec::new(),
            historical_step_window: None,
        }
    }
}

impl FeatureConfig {
    /// Load configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, FeatureError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, FeatureError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Compute the configured features over one user's timeline.
///
/// Returns the augmented table; rows invalid for any requested windowed
/// feature are excluded when the table is written or its kept rows queried.
pub fn extract(timeline: Timeline, config: &FeatureConfig) -> Result<FeatureTable, FeatureError> {
    let runs = detect_runs(&timeline);
    let ids = run_ids(&timeline, &runs);
    debug!(
        "timeline: {} rows in {} contiguous runs",
        timeline.len(),
        runs.len()
    );

    let mut table = FeatureTable::new(timeline);

    if config.nighttime {
        let col = calendar::nighttime(table.timeline());
        table.push_column(col);
    }
    if config.weekday {
        let col = calendar::weekday(table.timeline());
        table.push_column(col);
    }
    for &w in &config.historical_hr_windows {
        let (mean, sd) = window::hr_mean_sd(table.timeline(), &ids, w)?;
        table.push_column(mean);
        table.push_column(sd);
    }
    if let Some(w) = config.historical_step_window {
        let col = window::step_sum(table.timeline(), &ids, w)?;
        table.push_column(col);
    }
    if config.activity {
        let col = counters::activity_counter(
            table.timeline(),
            counters::ACTIVITY_RESET_HOUR,
            counters::ACTIVITY_RESET_MINUTE,
            counters::DEFAULT_DURATION_CAP,
        )?;
        table.push_column(col);
    }
    if config.previous_sleep {
        let col =
            counters::previous_sleep_counter(table.timeline(), counters::DEFAULT_DURATION_CAP)?;
        table.push_column(col);
    }

    Ok(table)
}

/// Read a user CSV, extract features, write the augmented CSV.
///
/// Returns the number of rows written (post-drop).
pub fn extract_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &FeatureConfig,
) -> Result<usize, FeatureError> {
    let timeline = read_csv_path(&input)?;
    let total = timeline.len();

    let table = extract(timeline, config)?;
    let kept = table.kept_rows().len();
    info!(
        "{}: {} rows in, {} rows out ({} dropped for incomplete history)",
        input.as_ref().display(),
        total,
        kept,
        total - kept
    );

    table.write_csv(File::create(output)?)?;
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::test_support::minutes;
    use crate::types::Sample;
    use chrono::{Duration, NaiveDate};
    use pretty_assertions::assert_eq;

    fn full_config() -> FeatureConfig {
        FeatureConfig {
            nighttime: true,
            weekday: true,
            activity: true,
            previous_sleep: true,
            historical_hr_windows: vec![5, 15],
            historical_step_window: Some(10),
        }
    }

    #[test]
    fn test_config_defaults_compute_nothing() {
        let timeline = minutes(&[60.0; 4], &[]);
        let table = extract(timeline, &FeatureConfig::default()).unwrap();
        assert!(table.columns().is_empty());
        assert_eq!(table.kept_rows().len(), 4);
    }

    #[test]
    fn test_config_json_round_trip() {
        let config = full_config();
        let loaded = FeatureConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(loaded.historical_hr_windows, vec![5, 15]);
        assert_eq!(loaded.historical_step_window, Some(10));
        assert!(loaded.nighttime && loaded.activity && loaded.previous_sleep);
    }

    #[test]
    fn test_full_extraction_column_set() {
        let timeline = minutes(&[60.0; 30], &[]);
        let table = extract(timeline, &full_config()).unwrap();

        let names: Vec<&str> = table.columns().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "NIGHTTIME",
                "WEEKDAY",
                "MEAN_5MIN_HR",
                "SD_5MIN_HR",
                "MEAN_15MIN_HR",
                "SD_15MIN_HR",
                "10MIN_STEP_SUM",
                "ACTIVITY",
                "PSLEEP",
            ]
        );
    }

    #[test]
    fn test_drop_governed_by_widest_requested_window() {
        let timeline = minutes(&[60.0; 30], &[]);
        let table = extract(timeline, &full_config()).unwrap();

        // 30 gapless rows, widest window 15: the first 15 rows go
        assert_eq!(table.kept_rows(), (15..30).collect::<Vec<_>>());
    }

    #[test]
    fn test_counters_and_tags_never_drop_rows() {
        let timeline = minutes(&[60.0; 10], &[3]);
        let config = FeatureConfig {
            nighttime: true,
            activity: true,
            previous_sleep: true,
            ..Default::default()
        };
        let table = extract(timeline, &config).unwrap();
        assert_eq!(table.kept_rows().len(), 10);
    }

    #[test]
    fn test_independent_drop_sets_combine() {
        // Gap after index 4; W=2 invalidates rows 5,6 beyond the usual prefix,
        // W=4 invalidates 5..8. Union applies.
        let timeline = minutes(&[60.0; 12], &[4]);
        let config = FeatureConfig {
            historical_hr_windows: vec![2, 4],
            ..Default::default()
        };
        let table = extract(timeline, &config).unwrap();

        assert_eq!(table.kept_rows(), vec![4, 9, 10, 11]);
    }

    #[test]
    fn test_schema_error_when_hr_requested_without_heart() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let samples: Vec<Sample> = (0..3)
            .map(|i| Sample {
                timestamp: start + Duration::minutes(i),
                heart_rate: None,
                steps: 0,
                sleep: Some(0),
            })
            .collect();
        let timeline = Timeline::build(samples, false, true, true).unwrap();

        let config = FeatureConfig {
            historical_hr_windows: vec![5],
            ..Default::default()
        };
        assert!(matches!(
            extract(timeline, &config),
            Err(FeatureError::MissingColumn(c)) if c == "HEART"
        ));
    }

    #[test]
    fn test_extract_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("user1.csv");
        let output = dir.path().join("user1_featured.csv");

        let mut csv = String::from("DATE,HEART,STEP,SLEEP\n");
        for m in 0..6 {
            csv.push_str(&format!("2024-01-15 00:0{}:00,{},5,1\n", m, 60 + 2 * m));
        }
        std::fs::write(&input, csv).unwrap();

        let config = FeatureConfig {
            historical_hr_windows: vec![3],
            activity: true,
            ..Default::default()
        };
        let kept = extract_file(&input, &output, &config).unwrap();
        assert_eq!(kept, 3);

        let written = std::fs::read_to_string(&output).unwrap();
        let mut lines = written.lines();
        assert_eq!(
            lines.next(),
            Some("DATE,HEART,STEP,SLEEP,MEAN_3MIN_HR,SD_3MIN_HR,ACTIVITY")
        );
        // First surviving row is 00:03 with mean 62 over [60,62,64]
        let first = lines.next().unwrap();
        assert!(first.starts_with("2024-01-15 00:03:00,66,5,1,62,"));
    }

    #[test]
    fn test_empty_timeline_flows_through() {
        let timeline = Timeline::build(Vec::new(), true, true, true).unwrap();
        let table = extract(timeline, &full_config()).unwrap();
        assert!(table.kept_rows().is_empty());
        assert_eq!(table.columns().len(), 9);
    }
}
