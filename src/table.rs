//! Per-user tabular I/O
//!
//! Reads one user's minute-level CSV into a [`Timeline`] and writes the
//! augmented table back out. The reader is header-driven: `DATE` is required,
//! `HEART`/`STEP`/`SLEEP` are recognized when present, anything else is
//! ignored. [`FeatureTable`] holds the derived columns appended during an
//! invocation and performs the single end-of-invocation drop pass for rows
//! lacking trailing history.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDateTime;

use crate::error::FeatureError;
use crate::timeline::Timeline;
use crate::types::{FeatureColumn, Sample, COL_DATE, COL_HEART, COL_SLEEP, COL_STEP};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_timestamp(raw: &str, row: usize) -> Result<NaiveDateTime, FeatureError> {
    for fmt in DATE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw.trim(), fmt) {
            return Ok(t);
        }
    }
    Err(FeatureError::ParseError {
        row,
        value: raw.to_string(),
    })
}

/// Read one user's table from CSV.
pub fn read_csv<R: Read>(reader: R) -> Result<Timeline, FeatureError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?.clone();
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    let date_ix = position(COL_DATE).ok_or_else(|| FeatureError::MissingColumn(COL_DATE.into()))?;
    let heart_ix = position(COL_HEART);
    let step_ix = position(COL_STEP);
    let sleep_ix = position(COL_SLEEP);

    let mut samples = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // 1-based data row number for error reporting
        let row = i + 1;

        let timestamp = parse_timestamp(&record[date_ix], row)?;

        let heart_rate = match heart_ix.map(|ix| record[ix].trim()) {
            Some("") | None => None,
            Some(raw) => Some(raw.parse::<f64>().map_err(|_| FeatureError::ValueError {
                row,
                column: COL_HEART.into(),
                value: raw.to_string(),
            })?),
        };

        // Empty step cells read as zero
        let steps = match step_ix.map(|ix| record[ix].trim()) {
            Some("") | None => 0,
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|v| *v >= 0.0)
                .map(|v| v as u32)
                .ok_or_else(|| FeatureError::ValueError {
                    row,
                    column: COL_STEP.into(),
                    value: raw.to_string(),
                })?,
        };

        let sleep = match sleep_ix.map(|ix| record[ix].trim()) {
            Some("") | None => None,
            Some(raw) => {
                let v = raw
                    .parse::<f64>()
                    .map_err(|_| FeatureError::ValueError {
                        row,
                        column: COL_SLEEP.into(),
                        value: raw.to_string(),
                    })?;
                Some(u8::from(v != 0.0))
            }
        };

        samples.push(Sample {
            timestamp,
            heart_rate,
            steps,
            sleep,
        });
    }

    Timeline::build(
        samples,
        heart_ix.is_some(),
        step_ix.is_some(),
        sleep_ix.is_some(),
    )
}

/// Read one user's table from a CSV file on disk.
pub fn read_csv_path(path: impl AsRef<Path>) -> Result<Timeline, FeatureError> {
    read_csv(File::open(path)?)
}

/// A timeline plus the derived columns appended during one invocation.
///
/// Feature appends are pure with respect to the timeline; dropping happens
/// once, after all appends, so an early drop can never corrupt an unrelated
/// feature's view of the series.
#[derive(Debug)]
pub struct FeatureTable {
    timeline: Timeline,
    columns: Vec<FeatureColumn>,
}

impl FeatureTable {
    pub fn new(timeline: Timeline) -> Self {
        Self {
            timeline,
            columns: Vec::new(),
        }
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Append a derived column. The column must cover every timeline row.
    pub fn push_column(&mut self, column: FeatureColumn) {
        debug_assert_eq!(column.values.len(), self.timeline.len());
        self.columns.push(column);
    }

    /// Indices of rows surviving the drop pass: a row is kept unless some
    /// column with `drops_incomplete` holds `None` for it.
    pub fn kept_rows(&self) -> Vec<usize> {
        (0..self.timeline.len())
            .filter(|&i| {
                self.columns
                    .iter()
                    .all(|c| !c.drops_incomplete || c.values[i].is_some())
            })
            .collect()
    }

    /// Write the augmented table as CSV: the surviving source columns first,
    /// derived columns after, dropped rows omitted.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), FeatureError> {
        let mut wtr = csv::Writer::from_writer(writer);
        self.write_into(&mut wtr, true)?;
        wtr.flush()?;
        Ok(())
    }

    /// Write rows into an existing CSV writer, optionally with the header.
    /// Used by callers concatenating several users into one combined file.
    pub fn write_into<W: Write>(
        &self,
        wtr: &mut csv::Writer<W>,
        include_header: bool,
    ) -> Result<(), FeatureError> {
        let t = &self.timeline;

        if include_header {
            let mut header = vec![COL_DATE.to_string()];
            if t.has_heart() {
                header.push(COL_HEART.to_string());
            }
            if t.has_steps() {
                header.push(COL_STEP.to_string());
            }
            if t.has_sleep() {
                header.push(COL_SLEEP.to_string());
            }
            header.extend(self.columns.iter().map(|c| c.name.clone()));
            wtr.write_record(&header)?;
        }

        for i in self.kept_rows() {
            let sample = &t.samples()[i];
            let mut record = vec![sample.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()];
            if t.has_heart() {
                record.push(sample.heart_rate.map(|v| v.to_string()).unwrap_or_default());
            }
            if t.has_steps() {
                record.push(sample.steps.to_string());
            }
            if t.has_sleep() {
                record.push(sample.sleep.map(|v| v.to_string()).unwrap_or_default());
            }
            for column in &self.columns {
                record.push(column.values[i].map(|v| v.to_string()).unwrap_or_default());
            }
            wtr.write_record(&record)?;
        }

        Ok(())
    }
}
