//! sleepfeat - Gap-aware minute-level feature extraction for sleep/wake classification
//!
//! sleepfeat turns one user's minute-resolution physiological series (heart
//! rate, steps, sleep labels) into a richer feature table through a
//! deterministic pipeline: timeline indexing → contiguity detection →
//! windowed aggregation / boundary-reset counters / calendar tagging →
//! a single drop pass for rows lacking trailing history.
//!
//! ## Modules
//!
//! - **timeline / contiguity**: ordered, densely indexed series and its
//!   maximal gap-free runs
//! - **window**: trailing mean/sd/sum aggregates that refuse windows
//!   straddling a data gap
//! - **counters / calendar**: boundary-reset running totals and stateless
//!   per-row flags
//! - **table / pipeline**: CSV adaptation, feature configuration and
//!   orchestration

pub mod calendar;
pub mod contiguity;
pub mod counters;
pub mod error;
pub mod pipeline;
pub mod table;
pub mod timeline;
pub mod types;
pub mod window;

pub use contiguity::{detect_runs, run_ids};
pub use error::FeatureError;
pub use pipeline::{extract, extract_file, FeatureConfig};
pub use table::{read_csv, read_csv_path, FeatureTable};
pub use timeline::Timeline;
pub use types::{ContiguousRun, FeatureColumn, Sample};

/// Crate version embedded in CLI output
pub const SLEEPFEAT_VERSION: &str = env!("CARGO_PKG_VERSION");
