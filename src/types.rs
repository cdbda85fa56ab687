//! Core types for the sleepfeat pipeline
//!
//! This module defines the data that flows through each stage: raw minute
//! samples, the indexed timeline they form, contiguous runs within it, and
//! the derived feature columns appended on top.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Column name for the timestamp field
pub const COL_DATE: &str = "DATE";
/// Column name for heart rate
pub const COL_HEART: &str = "HEART";
/// Column name for step count
pub const COL_STEP: &str = "STEP";
/// Column name for the sleep label
pub const COL_SLEEP: &str = "SLEEP";

/// One minute-resolution observation for a single user.
///
/// `heart_rate` and `sleep` are per-cell optional: the column may be present
/// in the source table while individual cells are empty. Step counts read as
/// zero when the cell is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Observation time, minute precision, local wall clock
    pub timestamp: NaiveDateTime,
    /// Heart rate (bpm)
    pub heart_rate: Option<f64>,
    /// Steps recorded in this minute
    pub steps: u32,
    /// Sleep label (1 = asleep, 0 = awake)
    pub sleep: Option<u8>,
}

/// A maximal span of the timeline with no missing minute.
///
/// `length == end_index - start_index`, so a singleton run has length 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContiguousRun {
    pub start_index: usize,
    pub end_index: usize,
    pub length: usize,
}

/// A derived per-row feature column.
///
/// Windowed aggregates leave `None` where the row lacks the required trailing
/// history; those rows are removed in a single pass at the end of the
/// invocation. Counters and calendar tags are dense and never cause drops.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
    /// Whether `None` cells in this column remove their row from the output
    pub drops_incomplete: bool,
}

impl FeatureColumn {
    /// A dense column (counter or calendar tag); rows are never dropped.
    pub fn dense(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values: values.into_iter().map(Some).collect(),
            drops_incomplete: false,
        }
    }

    /// A windowed column; `None` cells mark rows with incomplete history.
    pub fn windowed(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: name.into(),
            values,
            drops_incomplete: true,
        }
    }
}

/// Name of the rolling heart-rate mean column for window `w`
pub fn mean_hr_label(w: usize) -> String {
    format!("MEAN_{}MIN_HR", w)
}

/// Name of the rolling heart-rate standard deviation column for window `w`
pub fn sd_hr_label(w: usize) -> String {
    format!("SD_{}MIN_HR", w)
}

/// Name of the rolling step-sum column for window `w`
pub fn step_sum_label(w: usize) -> String {
    format!("{}MIN_STEP_SUM", w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_labels() {
        assert_eq!(mean_hr_label(10), "MEAN_10MIN_HR");
        assert_eq!(sd_hr_label(10), "SD_10MIN_HR");
        assert_eq!(step_sum_label(10), "10MIN_STEP_SUM");
    }

    #[test]
    fn test_dense_column_never_drops() {
        let col = FeatureColumn::dense("ACTIVITY", vec![0.0, 5.0, 10.0]);
        assert!(!col.drops_incomplete);
        assert_eq!(col.values, vec![Some(0.0), Some(5.0), Some(10.0)]);
    }
}
