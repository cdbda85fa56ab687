//! Trailing-window aggregation
//!
//! For a window width `W`, row `i` aggregates the `W` samples at indices
//! `i-W..i-1` — and only when `i-W..=i` all sit inside one contiguous run and
//! no source value in the span is absent. The policy is strict: a single
//! missing or out-of-cadence minute invalidates the whole window, with no
//! partial-window fallback. Invalid rows carry `None` and are removed at the
//! end of the invocation by the table layer.
//!
//! The scan is a single pass carrying a running sum and sum of squares for
//! the trailing `W` values, so each aggregate is O(1) per row rather than a
//! nested `O(W)` backward walk.

use crate::error::FeatureError;
use crate::timeline::Timeline;
use crate::types::{mean_hr_label, sd_hr_label, step_sum_label, FeatureColumn, COL_HEART, COL_STEP};

/// Aggregates over one valid trailing window of exactly `W` values.
#[derive(Debug, Clone, Copy, PartialEq)]
struct WindowStats {
    mean: f64,
    sd: f64,
    sum: f64,
}

/// Per-row trailing-window statistics over `values`.
///
/// `run_ids` is the dense run membership from [`crate::contiguity::run_ids`];
/// the window ending at row `i` is valid iff `i >= w`, rows `i-w` and `i`
/// share a run, and no value in `i-w..i-1` is `None`. Population formulas
/// over exactly `w` values.
fn rolling_stats(
    values: &[Option<f64>],
    run_ids: &[usize],
    w: usize,
) -> Result<Vec<Option<WindowStats>>, FeatureError> {
    if w == 0 {
        return Err(FeatureError::InvalidWindow);
    }

    let n = values.len();
    let mut out = Vec::with_capacity(n);
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut last_missing: Option<usize> = None;

    for i in 0..n {
        // Window for row i covers i-w..i-1; the running sums hold exactly
        // those values at this point in the scan.
        let valid = i >= w
            && run_ids[i] == run_ids[i - w]
            && last_missing.map_or(true, |m| m < i - w);

        if valid {
            let mean = sum / w as f64;
            // Population variance; clamp against float drift before sqrt
            let var = (sum_sq / w as f64 - mean * mean).max(0.0);
            out.push(Some(WindowStats {
                mean,
                sd: var.sqrt(),
                sum,
            }));
        } else {
            out.push(None);
        }

        match values[i] {
            Some(v) => {
                sum += v;
                sum_sq += v * v;
            }
            None => last_missing = Some(i),
        }
        if i >= w {
            if let Some(v) = values[i - w] {
                sum -= v;
                sum_sq -= v * v;
            }
        }
    }

    Ok(out)
}

/// Rolling mean and population standard deviation of heart rate over the
/// preceding `w` minutes.
///
/// Fails with a schema error before any work if the timeline carries no
/// `HEART` column.
pub fn hr_mean_sd(
    timeline: &Timeline,
    run_ids: &[usize],
    w: usize,
) -> Result<(FeatureColumn, FeatureColumn), FeatureError> {
    if !timeline.has_heart() {
        return Err(FeatureError::MissingColumn(COL_HEART.to_string()));
    }

    let values: Vec<Option<f64>> = timeline.samples().iter().map(|s| s.heart_rate).collect();
    let stats = rolling_stats(&values, run_ids, w)?;

    let means = stats.iter().map(|s| s.map(|s| s.mean)).collect();
    let sds = stats.iter().map(|s| s.map(|s| s.sd)).collect();
    Ok((
        FeatureColumn::windowed(mean_hr_label(w), means),
        FeatureColumn::windowed(sd_hr_label(w), sds),
    ))
}

/// Rolling sum of steps over the preceding `w` minutes.
pub fn step_sum(
    timeline: &Timeline,
    run_ids: &[usize],
    w: usize,
) -> Result<FeatureColumn, FeatureError> {
    if !timeline.has_steps() {
        return Err(FeatureError::MissingColumn(COL_STEP.to_string()));
    }

    let values: Vec<Option<f64>> = timeline
        .samples()
        .iter()
        .map(|s| Some(f64::from(s.steps)))
        .collect();
    let stats = rolling_stats(&values, run_ids, w)?;

    let sums = stats.iter().map(|s| s.map(|s| s.sum)).collect();
    Ok(FeatureColumn::windowed(step_sum_label(w), sums))
}
