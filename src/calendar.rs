//! Calendar feature tagging
//!
//! Stateless per-row flags from the timestamp alone: a night-time indicator
//! from the hour of day and a weekday indicator from the day of week. No
//! history, no drops.

use chrono::{Datelike, Timelike, Weekday};

use crate::timeline::Timeline;
use crate::types::FeatureColumn;

/// `NIGHTTIME`: 1 before 09:00 and after 21:59, 0 for the 9am-9pm day.
pub fn nighttime(timeline: &Timeline) -> FeatureColumn {
    let values = timeline
        .samples()
        .iter()
        .map(|s| {
            let hour = s.timestamp.hour();
            f64::from(u8::from(hour < 9 || hour > 21))
        })
        .collect();
    FeatureColumn::dense("NIGHTTIME", values)
}

/// `WEEKDAY`: 1 for Monday through Friday, 0 for Saturday and Sunday.
pub fn weekday(timeline: &Timeline) -> FeatureColumn {
    let values = timeline
        .samples()
        .iter()
        .map(|s| {
            let is_weekend = matches!(s.timestamp.weekday(), Weekday::Sat | Weekday::Sun);
            f64::from(u8::from(!is_weekend))
        })
        .collect();
    FeatureColumn::dense("WEEKDAY", values)
}
