//! sleepfeat CLI - Command-line interface for sleepfeat
//!
//! Commands:
//! - extract: Process one user's CSV into an augmented feature table
//! - batch: Process every user CSV in a directory, optionally combining
//!   all augmented tables into one file

use clap::{Parser, Subcommand};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sleepfeat::pipeline::{extract, extract_file, FeatureConfig};
use sleepfeat::table::read_csv_path;
use sleepfeat::{FeatureError, SLEEPFEAT_VERSION};

/// sleepfeat - Minute-level feature extraction for sleep/wake classification
#[derive(Parser)]
#[command(name = "sleepfeat")]
#[command(version = SLEEPFEAT_VERSION)]
#[command(about = "Derive gap-aware features from minute-level wearable data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one user's CSV into an augmented feature table
    Extract {
        /// Input CSV path
        #[arg(short, long)]
        input: PathBuf,

        /// Output CSV path
        #[arg(short, long)]
        output: PathBuf,

        /// Feature configuration JSON file (defaults to the standard set)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Process every user CSV in a directory (one file per user)
    Batch {
        /// Directory of per-user CSV files
        #[arg(long)]
        input_dir: PathBuf,

        /// Directory for augmented per-user files
        #[arg(long)]
        output_dir: PathBuf,

        /// Also concatenate all augmented tables into this file
        #[arg(long)]
        combine: Option<PathBuf>,

        /// Feature configuration JSON file (defaults to the standard set)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the default feature configuration as JSON
    Config,
}

/// The feature set used for classification runs when no config is given.
fn default_config() -> FeatureConfig {
    FeatureConfig {
        nighttime: true,
        weekday: true,
        activity: true,
        previous_sleep: true,
        historical_hr_windows: vec![10],
        historical_step_window: Some(10),
    }
}

fn load_config(path: Option<&Path>) -> Result<FeatureConfig, FeatureError> {
    match path {
        Some(p) => FeatureConfig::from_json(&fs::read_to_string(p)?),
        None => Ok(default_config()),
    }
}

fn run_extract(input: &Path, output: &Path, config: Option<&Path>) -> Result<(), FeatureError> {
    let config = load_config(config)?;
    let kept = extract_file(input, output, &config)?;
    println!("{}: wrote {} rows", output.display(), kept);
    Ok(())
}

fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    combine: Option<&Path>,
    config: Option<&Path>,
) -> Result<(), FeatureError> {
    let config = load_config(config)?;
    fs::create_dir_all(output_dir)?;

    let mut inputs: Vec<PathBuf> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "csv"))
        .collect();
    inputs.sort();

    let mut combined = match combine {
        Some(path) => Some(csv::Writer::from_writer(File::create(path)?)),
        None => None,
    };
    let mut header_pending = true;
    let mut processed = 0usize;

    for input in &inputs {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("user");
        let output = output_dir.join(format!("{stem}_featured.csv"));

        // One bad user's file must not abort the rest of the batch
        let result = (|| -> Result<(), FeatureError> {
            let timeline = read_csv_path(input)?;
            let table = extract(timeline, &config)?;
            table.write_csv(File::create(&output)?)?;
            if let Some(wtr) = combined.as_mut() {
                table.write_into(wtr, header_pending)?;
                header_pending = false;
            }
            Ok(())
        })();

        match result {
            Ok(()) => {
                processed += 1;
                println!("processed {}", input.display());
            }
            Err(e) => log::error!("skipping {}: {}", input.display(), e),
        }
    }

    if let Some(mut wtr) = combined {
        wtr.flush()?;
    }
    println!("done: {} of {} files processed", processed, inputs.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Extract {
            input,
            output,
            config,
        } => run_extract(input, output, config.as_deref()),
        Commands::Batch {
            input_dir,
            output_dir,
            combine,
            config,
        } => run_batch(
            input_dir,
            output_dir,
            combine.as_deref(),
            config.as_deref(),
        ),
        Commands::Config => default_config()
            .to_json()
            .map(|json| println!("{json}")),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
