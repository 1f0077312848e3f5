use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use resoscan::analysis::{run_analysis, AnalysisConfig};
use resoscan::events::synthetic::{generate, SmearingModel, SyntheticConfig};
use resoscan::events::{EventWriter, EventWriterConfig};
use resoscan::scan::{Estimator, SampleSpec};
use resoscan::schema::ARTIFACT_EXTENSION;

use super::config::ScanConfig;
use super::scan;

/// Generate synthetic samples, analyze them and run the scan
pub fn run(
    directory: PathBuf,
    events: usize,
    fields: Vec<f64>,
    detectors: Vec<String>,
    seed: u64,
) -> Result<()> {
    info!("resoscan - Synthetic Field Scan Demo");
    info!("====================================");

    if fields.is_empty() || detectors.is_empty() {
        anyhow::bail!("Demo needs at least one field value and one detector");
    }

    let events_dir = directory.join("events");
    let histograms_dir = directory.join("histograms");
    fs::create_dir_all(&events_dir)
        .with_context(|| format!("Failed to create {}", events_dir.display()))?;
    fs::create_dir_all(&histograms_dir)
        .with_context(|| format!("Failed to create {}", histograms_dir.display()))?;

    let analysis = AnalysisConfig::default();
    let mut samples = Vec::new();
    let mut sample_seed = seed;

    for detector in &detectors {
        let model = SmearingModel::for_detector(detector)
            .with_context(|| format!("Unknown detector preset: {} (expected IDEA or CLD)", detector))?;

        for &field in &fields {
            let name = sample_name(detector, field);
            let config = SyntheticConfig {
                events,
                field,
                seed: sample_seed,
                model,
                ..SyntheticConfig::default()
            };
            sample_seed += 1;

            let events_path = events_dir.join(format!("{}.parquet", name));
            write_events(&events_path, &config)?;

            let artifact = format!("{}{}", name, ARTIFACT_EXTENSION);
            let run = run_analysis(&[events_path], &histograms_dir.join(&artifact), &analysis)
                .with_context(|| format!("Analysis of {} failed", name))?;
            info!("  {}: {}", name, run.stats);

            samples.push(SampleSpec::new(
                name,
                Path::new("histograms").join(artifact),
                field,
                detector.to_ascii_uppercase(),
            ));
        }
    }

    let mut scan_config = ScanConfig {
        samples,
        ..ScanConfig::default()
    };
    scan_config.reduce.rebin = 10;
    scan_config.reduce.estimators = vec![
        Estimator::GaussSigma,
        Estimator::QuantileResolution,
        Estimator::Rms,
    ];
    scan_config.output.directory = PathBuf::from("curves");

    let config_path = directory.join("scan.toml");
    fs::write(&config_path, scan_config.to_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    info!("Scan configuration: {}", config_path.display());

    scan::execute(&ScanConfig::from_file(&config_path)?)?;

    println!();
    println!("Demo complete. Re-run the scan with:");
    println!("  resoscan scan {}", config_path.display());
    Ok(())
}

fn sample_name(detector: &str, field: f64) -> String {
    format!("{}_{}T", detector.to_ascii_uppercase(), field)
}

fn write_events(path: &Path, config: &SyntheticConfig) -> Result<()> {
    let events = generate(config).context("Failed to generate synthetic events")?;
    let mut writer = EventWriter::new_file(path, "synthetic", EventWriterConfig::default())
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer
        .write_events(&events)
        .context("Failed to write events")?;
    let stats = writer.finish().context("Failed to finalize event file")?;
    info!("  {} -> {}", stats, path.display());
    Ok(())
}
