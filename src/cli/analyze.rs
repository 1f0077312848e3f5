use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use resoscan::analysis::{run_analysis, AnalysisConfig};
use resoscan::resolution::{PositionLookup, Quantity, SentinelPolicy};

use super::config::load_analysis_config;

/// Fill the histograms of one sample
pub fn run(
    inputs: Vec<PathBuf>,
    output: PathBuf,
    config: Option<PathBuf>,
    quantities: Vec<Quantity>,
    no_hadronic: bool,
    strict: Option<f32>,
    lookup: Option<PositionLookup>,
) -> Result<()> {
    for input in &inputs {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
    }

    let mut config = match config {
        Some(path) => load_analysis_config(&path)?,
        None => AnalysisConfig::default(),
    };

    // command-line flags win over the config file
    if !quantities.is_empty() {
        config.quantities = quantities;
    }
    if no_hadronic {
        config.hadronic = false;
    }
    if let Some(bound) = strict {
        if !(bound > 0.0) {
            anyhow::bail!("--strict bound must be positive, got {}", bound);
        }
        config.policy = SentinelPolicy::strict(bound);
    }
    if let Some(lookup) = lookup {
        config.lookup = lookup;
    }

    info!("resoscan - Analyze");
    info!("==================");
    for input in &inputs {
        info!("Input:  {}", input.display());
    }
    info!("Output: {}", output.display());
    info!(
        "Quantities: {}",
        config
            .quantities
            .iter()
            .map(|q| q.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let run = run_analysis(&inputs, &output, &config).context("Analysis failed")?;

    println!("{}", run.stats);
    println!("{}", run.artifact);
    println!("Artifact: {}", output.display());
    Ok(())
}
