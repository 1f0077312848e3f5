use anyhow::{Context, Result};
use std::path::PathBuf;

use resoscan::artifact::HistogramFile;
use resoscan::reducer::{reduce_with, FitWindow, ReduceConfig};

/// Reduce one histogram and print its statistics
pub fn run(file: PathBuf, histogram: String, rebin: usize, full_range: bool, json: bool) -> Result<()> {
    let artifact = HistogramFile::open(&file)
        .with_context(|| format!("Failed to open artifact: {}", file.display()))?;

    let hist = artifact.get(&histogram).with_context(|| {
        format!(
            "Histogram '{}' not found in {} (available: {})",
            histogram,
            file.display(),
            artifact.names().collect::<Vec<_>>().join(", ")
        )
    })?;

    let config = ReduceConfig {
        rebin,
        fit_window: if full_range {
            FitWindow::FullRange
        } else {
            FitWindow::Quantile
        },
        ..ReduceConfig::default()
    };
    let stat = reduce_with(hist, &config)
        .with_context(|| format!("Failed to reduce '{}'", histogram))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stat)?);
        return Ok(());
    }

    println!("{} [{}]", file.display(), histogram);
    println!(
        "  Entries: {} ({} bins after rebin {})",
        stat.entries,
        hist.n_bins() / rebin,
        rebin
    );
    println!("  {}", stat.percent());
    if let Some(reason) = &stat.fit_failure {
        println!("  Fit failed: {}", reason);
    }
    Ok(())
}
