//! Contiguity detection
//!
//! Splits a timeline into maximal runs where consecutive samples are exactly
//! one minute apart. Windowed aggregates use run membership to refuse any
//! window that straddles a gap.

use chrono::Duration;

use crate::timeline::Timeline;
use crate::types::ContiguousRun;

/// Detect the contiguous runs of a timeline.
///
/// Runs are emitted in increasing `start_index` order and partition the
/// timeline exhaustively: every index belongs to exactly one run, singleton
/// runs included. An empty timeline yields no runs.
pub fn detect_runs(timeline: &Timeline) -> Vec<ContiguousRun> {
    let samples = timeline.samples();
    if samples.is_empty() {
        return Vec::new();
    }

    let minute = Duration::minutes(1);
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..samples.len() {
        if samples[i].timestamp != samples[i - 1].timestamp + minute {
            runs.push(ContiguousRun {
                start_index: start,
                end_index: i - 1,
                length: i - 1 - start,
            });
            start = i;
        }
    }
    runs.push(ContiguousRun {
        start_index: start,
        end_index: samples.len() - 1,
        length: samples.len() - 1 - start,
    });

    runs
}

/// Dense run id per timeline index, derived from [`detect_runs`] output.
///
/// Two indices share a run id iff every minute between them is present, which
/// is the exact validity condition for a trailing window.
pub fn run_ids(timeline: &Timeline, runs: &[ContiguousRun]) -> Vec<usize> {
    let mut ids = vec![0; timeline.len()];
    for (id, run) in runs.iter().enumerate() {
        for slot in &mut ids[run.start_index..=run.end_index] {
            *slot = id;
        }
    }
    ids
}
