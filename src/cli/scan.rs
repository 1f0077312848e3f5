use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use resoscan::scan::{ArtifactSource, Estimator, ScanCurves, ScanReport, ScanRunner};

use super::config::{OutputFormat, ScanConfig};

/// Run a scan described by a TOML file
pub fn run(
    config_path: PathBuf,
    histogram: Option<String>,
    rebin: Option<usize>,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
) -> Result<()> {
    let mut config = ScanConfig::from_file(&config_path)?;

    if let Some(histogram) = histogram {
        config.reduce.histogram = histogram;
    }
    if let Some(rebin) = rebin {
        config.reduce.rebin = rebin;
    }
    if let Some(output) = output {
        config.output.directory = output;
    }
    if let Some(format) = format {
        config.output.format = format;
    }

    execute(&config)
}

/// Reduce every sample of `config`, print the report and write the outputs
pub fn execute(config: &ScanConfig) -> Result<()> {
    config.validate()?;

    let runner = ScanRunner::new(config.reduce.histogram.clone(), config.reduce.reduce_config());
    let report = runner.run(&ArtifactSource, &config.samples);

    println!("{}", report.format_colored());

    let written = write_outputs(&report, config)?;
    for path in &written {
        info!("Wrote {}", path.display());
    }

    if report.samples.is_empty() {
        anyhow::bail!(
            "None of the {} samples could be reduced",
            config.samples.len()
        );
    }
    Ok(())
}

/// Write the report and one curve file per estimator; returns the paths written.
pub fn write_outputs(report: &ScanReport, config: &ScanConfig) -> Result<Vec<PathBuf>> {
    let dir = &config.output.directory;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let mut written = Vec::new();

    let report_path = dir.join(format!("{}_report.json", report.histogram));
    fs::write(&report_path, serde_json::to_string_pretty(report)?)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    written.push(report_path);

    for estimator in unique_estimators(&config.reduce.estimators) {
        let curves = report.curves(estimator);
        let path = dir.join(format!(
            "{}_{}.{}",
            report.histogram,
            estimator,
            config.output.format.extension()
        ));
        match config.output.format {
            OutputFormat::Csv => write_curves_csv(&path, &curves),
            OutputFormat::Json => write_curves_json(&path, &curves),
        }
        .with_context(|| format!("Failed to write {} curves to {}", estimator, path.display()))?;
        written.push(path);
    }

    Ok(written)
}

/// `detector,scan_parameter,value` rows, detectors in name order
fn write_curves_csv(path: &Path, curves: &ScanCurves) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["detector", "scan_parameter", "value"])?;
    for curve in curves.values() {
        for point in &curve.points {
            wtr.write_record(&[
                point.detector.clone(),
                point.scan_parameter.to_string(),
                point.value.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

fn write_curves_json(path: &Path, curves: &ScanCurves) -> Result<()> {
    fs::write(path, serde_json::to_string_pretty(curves)?)?;
    Ok(())
}

/// Configuration order, duplicates dropped
fn unique_estimators(estimators: &[Estimator]) -> Vec<Estimator> {
    let mut unique = Vec::with_capacity(estimators.len());
    for &estimator in estimators {
        if !unique.contains(&estimator) {
            unique.push(estimator);
        }
    }
    unique
}
