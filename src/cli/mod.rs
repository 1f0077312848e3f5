use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use resoscan::resolution::{PositionLookup, Quantity};

mod analyze;
mod config;
mod demo;
mod info;
mod reduce;
mod scan;

pub use config::OutputFormat;

/// resoscan - momentum resolution across detector scans
#[derive(Parser)]
#[command(name = "resoscan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Resolution quantity selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum QuantityArg {
    /// Total momentum
    P,
    /// Transverse momentum
    Pt,
    /// Inverse transverse momentum
    InvPt,
    /// Inverse total momentum
    InvP,
}

impl From<QuantityArg> for Quantity {
    fn from(arg: QuantityArg) -> Self {
        match arg {
            QuantityArg::P => Quantity::P,
            QuantityArg::Pt => Quantity::Pt,
            QuantityArg::InvPt => Quantity::InvPt,
            QuantityArg::InvP => Quantity::InvP,
        }
    }
}

/// Strategy for locating muons in the reconstructed collection.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LookupArg {
    /// Linear scan per muon
    Linear,
    /// Hash map built once per event
    Hashed,
}

impl From<LookupArg> for PositionLookup {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::Linear => PositionLookup::LinearScan,
            LookupArg::Hashed => PositionLookup::Hashed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fill resolution histograms from event files into one artifact
    Analyze {
        /// Input event Parquet files, processed in order
        #[arg(value_name = "INPUT", required = true)]
        inputs: Vec<PathBuf>,

        /// Output histogram artifact
        #[arg(short, long, value_name = "OUTPUT")]
        output: PathBuf,

        /// Load analysis settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Resolution quantities to histogram (repeatable)
        #[arg(short, long, value_enum)]
        quantity: Vec<QuantityArg>,

        /// Skip the hadronic histograms
        #[arg(long)]
        no_hadronic: bool,

        /// Drop sentinels and events with |resolution| >= BOUND
        #[arg(long, value_name = "BOUND")]
        strict: Option<f32>,

        /// Position lookup strategy
        #[arg(long, value_enum)]
        lookup: Option<LookupArg>,
    },

    /// Reduce one histogram of an artifact to summary statistics
    Reduce {
        /// Histogram artifact
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Histogram key
        #[arg(short = 'k', long, default_value = "muons_res_pt")]
        histogram: String,

        /// Rebin factor
        #[arg(short, long, default_value = "1")]
        rebin: usize,

        /// Fit over the whole histogram instead of the quantile window
        #[arg(long)]
        full_range: bool,

        /// Print the statistic as JSON
        #[arg(long)]
        json: bool,
    },

    /// Reduce every sample of a scan and write the resolution curves
    Scan {
        /// Scan configuration (TOML)
        #[arg(value_name = "CONFIG")]
        config: PathBuf,

        /// Override the histogram key
        #[arg(short = 'k', long)]
        histogram: Option<String>,

        /// Override the rebin factor
        #[arg(short, long)]
        rebin: Option<usize>,

        /// Override the output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Override the curve format
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// Generate synthetic IDEA/CLD samples across a field scan and run the whole chain
    Demo {
        /// Working directory for events, artifacts and curves
        #[arg(value_name = "DIR", default_value = "resoscan_demo")]
        directory: PathBuf,

        /// Events per sample
        #[arg(short = 'n', long, default_value = "2000")]
        events: usize,

        /// Field values in Tesla
        #[arg(long, value_delimiter = ',', default_value = "1,2,3")]
        fields: Vec<f64>,

        /// Detector presets
        #[arg(long, value_delimiter = ',', default_value = "IDEA,CLD")]
        detectors: Vec<String>,

        /// Random seed of the first sample
        #[arg(long, default_value = "42")]
        seed: u64,
    },

    /// Display information about an event file or histogram artifact
    Info {
        /// Input Parquet file
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Analyze {
            inputs,
            output,
            config,
            quantity,
            no_hadronic,
            strict,
            lookup,
        } => analyze::run(
            inputs,
            output,
            config,
            quantity.into_iter().map(Quantity::from).collect(),
            no_hadronic,
            strict,
            lookup.map(PositionLookup::from),
        ),
        Commands::Reduce {
            file,
            histogram,
            rebin,
            full_range,
            json,
        } => reduce::run(file, histogram, rebin, full_range, json),
        Commands::Scan {
            config,
            histogram,
            rebin,
            output,
            format,
        } => scan::run(config, histogram, rebin, output, format),
        Commands::Demo {
            directory,
            events,
            fields,
            detectors,
            seed,
        } => demo::run(directory, events, fields, detectors, seed),
        Commands::Info { file } => info::run(file),
    }
}
