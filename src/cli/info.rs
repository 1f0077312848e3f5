use anyhow::{Context, Result};
use std::fs::File;
use std::path::PathBuf;

use parquet::file::reader::{FileReader, SerializedFileReader};
use resoscan::artifact::HistogramFile;
use resoscan::events::EventReader;
use resoscan::schema::{create_event_schema, create_histogram_schema, validate_event_schema, validate_histogram_schema};

/// Display information about an event file or histogram artifact
pub fn run(file: PathBuf) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let file_handle = File::open(&file).context("Failed to open file")?;
    let reader = SerializedFileReader::new(file_handle).context("Failed to read Parquet file")?;
    let metadata = reader.metadata();
    let file_metadata = metadata.file_metadata();

    println!("resoscan File Information");
    println!("=========================");
    println!("File: {}", file.display());
    println!("  Row groups: {}", metadata.num_row_groups());
    println!("  Total rows: {}", file_metadata.num_rows());
    println!();

    if let Some(kv_metadata) = file_metadata.key_value_metadata() {
        println!("Metadata Keys:");
        for kv in kv_metadata {
            let value = kv.value.as_deref().unwrap_or("<null>");
            if value.len() > 100 {
                println!("  {}: {}... ({} bytes)", kv.key, truncate(value, 100), value.len());
            } else {
                println!("  {}: {}", kv.key, value);
            }
        }
        println!();
    }

    let arrow_schema = parquet::arrow::parquet_to_arrow_schema(
        file_metadata.schema_descr(),
        file_metadata.key_value_metadata(),
    )
    .context("Failed to read Arrow schema")?;

    if validate_histogram_schema(&arrow_schema).is_ok() {
        let artifact = HistogramFile::open(&file).context("Failed to read histogram artifact")?;
        println!("Histogram artifact (format {})", artifact.format_version());
        for hist in artifact.histograms() {
            println!(
                "  {:<20} {:>6} bins [{}, {}) {:>10} entries",
                hist.name(),
                hist.n_bins(),
                hist.lo(),
                hist.hi(),
                hist.entries()
            );
        }
    } else if validate_event_schema(&arrow_schema).is_ok() {
        let summary = EventReader::open(&file)
            .context("Failed to open event file")?
            .summary()
            .context("Failed to read events")?;
        println!("Event file");
        println!("  {}", summary);
    } else {
        println!(
            "Not a resoscan file (expected {} event columns or {} histogram columns)",
            create_event_schema().fields().len(),
            create_histogram_schema().fields().len()
        );
    }

    Ok(())
}

fn truncate(value: &str, max: usize) -> &str {
    let mut end = max.min(value.len());
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}
