//! # labnorm CLI
//!
//! A command-line wrapper around the normalization library.
//!
//! ## Usage
//!
//! ```bash
//! # Normalize a sample from its raw files and write the archive JSON
//! labnorm normalize --composition xrf.csv --spectrum uvvis.csv -o archive.json
//!
//! # Just the band gap
//! labnorm extract uvvis.csv
//!
//! # Just the element list
//! labnorm elements xrf.csv
//!
//! # Check a previously written archive against the schema
//! labnorm validate archive.json
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use labnorm::archive::standard_schema;
use labnorm::bandgap::{extract_band_gap_with_config, ExtractorConfig};
use labnorm::composition::CompositionRecord;
use labnorm::config::Config;
use labnorm::normalize::{normalize, SampleRecord};
use labnorm::spectrum::Spectrum;
use labnorm::validator::validate_archive_file;

/// labnorm - Laboratory Sample Normalization
#[derive(Parser)]
#[command(name = "labnorm")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a sample from its raw instrument files
    Normalize {
        /// Elemental-composition table (element symbols in column one)
        #[arg(long, value_name = "FILE")]
        composition: Option<PathBuf>,

        /// Absorbance spectrum table (wavelength, absorbance)
        #[arg(long, value_name = "FILE")]
        spectrum: Option<PathBuf>,

        /// Output path for the archive JSON (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Sample name to record
        #[arg(long)]
        name: Option<String>,

        /// TOML file with extractor tuning parameters
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Extract the band-gap energy from an absorbance spectrum
    Extract {
        /// Absorbance spectrum table (wavelength, absorbance)
        #[arg(value_name = "FILE")]
        spectrum: PathBuf,

        /// TOML file with extractor tuning parameters
        #[arg(short = 'c', long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// List the elements in a composition table
    Elements {
        /// Elemental-composition table
        #[arg(value_name = "FILE")]
        composition: PathBuf,
    },

    /// Validate an archive JSON against the standard schema
    Validate {
        /// Archive JSON written by `labnorm normalize`
        #[arg(value_name = "FILE")]
        archive: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Normalize {
            composition,
            spectrum,
            output,
            name,
            config,
        } => run_normalize(composition, spectrum, output, name, config),
        Commands::Extract { spectrum, config } => run_extract(spectrum, config),
        Commands::Elements { composition } => run_elements(composition),
        Commands::Validate { archive } => run_validate(archive),
    }
}

fn load_extractor_config(path: Option<PathBuf>) -> Result<ExtractorConfig> {
    let base = ExtractorConfig::default();
    match path {
        Some(path) => Ok(Config::from_file(&path)?.extraction.apply(base)),
        None => Ok(base),
    }
}

fn run_normalize(
    composition: Option<PathBuf>,
    spectrum: Option<PathBuf>,
    output: Option<PathBuf>,
    name: Option<String>,
    config: Option<PathBuf>,
) -> Result<()> {
    if composition.is_none() && spectrum.is_none() {
        anyhow::bail!("nothing to normalize: pass --composition and/or --spectrum");
    }

    let extractor_config = load_extractor_config(config)?;

    let mut record = SampleRecord::new();
    record.name = name;
    record.composition_file = composition;
    record.band_gap_file = spectrum;

    let schema = standard_schema();
    let report = normalize(&mut record, &schema, &extractor_config)?;

    if let Some(elements) = &report.elements {
        info!("elements: {}", elements.join(", "));
    }
    if let Some(band_gap) = report.band_gap {
        info!("band gap: {}", band_gap);
    }
    for skipped in &report.skipped {
        eprintln!(
            "warning: {} not derived: {}",
            skipped.property, skipped.error
        );
    }

    let json = serde_json::to_string_pretty(&record).context("Failed to serialize archive")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("archive written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn run_extract(spectrum: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let extractor_config = load_extractor_config(config)?;
    let spectrum = Spectrum::from_file(&spectrum)
        .with_context(|| format!("Failed to read spectrum {}", spectrum.display()))?;
    let band_gap = extract_band_gap_with_config(&spectrum, &extractor_config)?;
    println!("{band_gap}");
    Ok(())
}

fn run_elements(composition: PathBuf) -> Result<()> {
    let record = CompositionRecord::from_file(&composition)
        .with_context(|| format!("Failed to read composition {}", composition.display()))?;
    for element in record.elements() {
        println!("{element}");
    }
    Ok(())
}

fn run_validate(archive: PathBuf) -> Result<()> {
    let schema = standard_schema();
    let report = validate_archive_file(&archive, &schema)
        .with_context(|| format!("Failed to read archive {}", archive.display()))?;

    #[cfg(feature = "colorized_output")]
    {
        println!("{}", report.format_colored());
    }

    #[cfg(not(feature = "colorized_output"))]
    {
        println!("{}", report);
    }

    // Exit with error code if validation failed
    if report.has_failures() {
        std::process::exit(1);
    }

    Ok(())
}
