//! Timeline indexing
//!
//! A [`Timeline`] is one user's samples sorted ascending by timestamp and
//! assigned a dense position index `0..n-1`. It is built once per invocation
//! and immutable afterwards; every downstream component takes it by reference.

use chrono::NaiveDateTime;

use crate::error::FeatureError;
use crate::types::Sample;

/// One user's ordered, densely indexed minute series.
///
/// Column presence is tracked here so that feature computations can
/// distinguish "the HEART column was never supplied" (a schema error) from
/// "this cell is empty" (a window-validity concern).
#[derive(Debug, Clone)]
pub struct Timeline {
    samples: Vec<Sample>,
    has_heart: bool,
    has_steps: bool,
    has_sleep: bool,
}

impl Timeline {
    /// Build a timeline from an unordered collection of samples.
    ///
    /// Sorts ascending by timestamp without mutating the caller's data.
    /// Duplicate timestamps within one series are rejected. An empty
    /// collection yields an empty timeline.
    pub fn build(
        mut samples: Vec<Sample>,
        has_heart: bool,
        has_steps: bool,
        has_sleep: bool,
    ) -> Result<Self, FeatureError> {
        samples.sort_by_key(|s| s.timestamp);

        for pair in samples.windows(2) {
            if pair[0].timestamp == pair[1].timestamp {
                return Err(FeatureError::DuplicateTimestamp(
                    pair[0].timestamp.to_string(),
                ));
            }
        }

        Ok(Self {
            samples,
            has_heart,
            has_steps,
            has_sleep,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn timestamp(&self, index: usize) -> NaiveDateTime {
        self.samples[index].timestamp
    }

    pub fn has_heart(&self) -> bool {
        self.has_heart
    }

    pub fn has_steps(&self) -> bool {
        self.has_steps
    }

    pub fn has_sleep(&self) -> bool {
        self.has_sleep
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use chrono::{Duration, NaiveDate};

    /// Minute-spaced samples starting at 2024-01-15 00:00, one per entry of
    /// `hr`. `gaps_after` lists indices after which one minute is skipped.
    pub fn minutes(hr: &[f64], gaps_after: &[usize]) -> Timeline {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let mut t = start;
        let mut samples = Vec::new();
        for (i, &h) in hr.iter().enumerate() {
            samples.push(Sample {
                timestamp: t,
                heart_rate: Some(h),
                steps: 0,
                sleep: Some(0),
            });
            t += Duration::minutes(1);
            if gaps_after.contains(&i) {
                t += Duration::minutes(1);
            }
        }
        Timeline::build(samples, true, true, true).unwrap()
    }
}
