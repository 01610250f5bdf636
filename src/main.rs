use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rusty_sorter::classifier::{presets, ClassificationObserver, LogObserver};
use rusty_sorter::data::loader;
use rusty_sorter::{Classifier, ClassifierConfig, ReportCollector};

#[derive(Parser)]
#[command(name = "rusty-sorter")]
#[command(about = "Rule-based FTIR plastic classifier")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify every spectrum in a .parquet, .json or .csv file
    Classify {
        file: PathBuf,

        /// TOML classifier configuration
        #[arg(short, long, conflicts_with = "preset")]
        config: Option<PathBuf>,

        /// Built-in configuration (standard, strict, legacy)
        #[arg(short, long, default_value = "standard")]
        preset: String,

        /// Write a JSON report with peaks and baselines
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Print a built-in configuration as TOML
    Preset { name: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Args::parse().command {
        Command::Classify {
            file,
            config,
            preset,
            report,
        } => classify(&file, config, &preset, report),
        Command::Preset { name } => {
            let config = presets::by_name(&name)?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

fn classify(
    file: &Path,
    config: Option<PathBuf>,
    preset: &str,
    report: Option<PathBuf>,
) -> Result<()> {
    let config = match config {
        Some(path) => ClassifierConfig::from_file(&path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => presets::by_name(preset)?,
    };
    let classifier = Classifier::new(config)?;

    let dataset = loader::load_file(file)
        .with_context(|| format!("loading spectra from {}", file.display()))?;

    let mut collector = ReportCollector::new();
    let mut log_observer = LogObserver;
    for (i, (spectrum, outcome)) in dataset
        .spectra
        .iter()
        .zip(classifier.classify_dataset(&dataset))
        .enumerate()
    {
        log_observer.observe(spectrum, &outcome);
        collector.observe(spectrum, &outcome);
        let name = spectrum
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("spectrum {i}"));
        println!("{name}\t{}", outcome.label);
    }

    for (label, count) in collector.label_counts() {
        log::info!("{label}: {count}");
    }

    if let Some(path) = report {
        collector.write_json(&path)?;
        log::info!("report written to {}", path.display());
    }
    Ok(())
}
