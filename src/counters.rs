//! Boundary-reset counters
//!
//! Running totals over the timeline that zero out when a reset condition
//! fires: a fixed time of day (the activity counter turns over at 04:00) or a
//! duration cap on minutes since the last reset (a safety net for when a data
//! gap skips the calendar boundary). Unlike the windowed aggregates these run
//! straight across gaps and never cause row drops.

use chrono::Timelike;

use crate::error::FeatureError;
use crate::timeline::Timeline;
use crate::types::{FeatureColumn, COL_SLEEP, COL_STEP};

/// Hour of the daily activity turnover
pub const ACTIVITY_RESET_HOUR: u32 = 4;
/// Minute of the daily activity turnover
pub const ACTIVITY_RESET_MINUTE: u32 = 0;
/// Duration cap in minutes (24 hours)
pub const DEFAULT_DURATION_CAP: u32 = 1440;

/// Minute-by-minute running step total (`ACTIVITY`).
///
/// Resets when the row's wall-clock time hits `reset_hour:reset_minute` or
/// when `cap` minutes have elapsed since the last reset. The emitted value
/// includes the current row's steps, except on a reset row, which emits 0 and
/// contributes nothing.
pub fn activity_counter(
    timeline: &Timeline,
    reset_hour: u32,
    reset_minute: u32,
    cap: u32,
) -> Result<FeatureColumn, FeatureError> {
    if !timeline.has_steps() {
        return Err(FeatureError::MissingColumn(COL_STEP.to_string()));
    }

    let mut sum: u64 = 0;
    let mut minutes_since_reset: u32 = 0;
    let mut values = Vec::with_capacity(timeline.len());

    for sample in timeline.samples() {
        let t = sample.timestamp.time();
        let at_boundary = t.hour() == reset_hour && t.minute() == reset_minute;
        if at_boundary || minutes_since_reset >= cap {
            sum = 0;
            minutes_since_reset = 0;
        } else {
            sum += u64::from(sample.steps);
            minutes_since_reset += 1;
        }
        values.push(sum as f64);
    }

    Ok(FeatureColumn::dense("ACTIVITY", values))
}

/// Minutes of sleep accumulated strictly before the current row (`PSLEEP`).
///
/// Duration-cap reset only. The emitted value excludes the current row's own
/// label; the label is folded in after emission so it shows up from the next
/// row onward.
pub fn previous_sleep_counter(timeline: &Timeline, cap: u32) -> Result<FeatureColumn, FeatureError> {
    if !timeline.has_sleep() {
        return Err(FeatureError::MissingColumn(COL_SLEEP.to_string()));
    }

    let mut minutes_of_sleep: u64 = 0;
    let mut minutes_since_reset: u32 = 0;
    let mut values = Vec::with_capacity(timeline.len());

    for sample in timeline.samples() {
        if minutes_since_reset >= cap {
            minutes_of_sleep = 0;
            minutes_since_reset = 0;
        }
        values.push(minutes_of_sleep as f64);
        if sample.sleep == Some(1) {
            minutes_of_sleep += 1;
        }
        minutes_since_reset += 1;
    }

    Ok(FeatureColumn::dense("PSLEEP", values))
}
