use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{
    ArrayRef, Float64Builder, ListBuilder, StringBuilder, UInt32Builder, UInt64Builder,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::format::KeyValue;

use crate::histogram::Histogram1D;
use crate::schema::{
    create_histogram_schema_arc, histogram_columns, ARTIFACT_FORMAT_VERSION, KEY_CREATED,
    KEY_FORMAT_VERSION, KEY_SOURCE,
};

use super::ArtifactError;

/// Configuration for the histogram writer
#[derive(Debug, Clone)]
pub struct HistogramWriterConfig {
    /// ZSTD compression level
    pub compression_level: i32,

    /// Target row group size in histograms
    pub row_group_size: usize,
}

impl Default for HistogramWriterConfig {
    fn default() -> Self {
        Self {
            compression_level: 3,
            row_group_size: 64, // one row can hold 10^4 bins
        }
    }
}

impl HistogramWriterConfig {
    fn to_writer_properties(&self, metadata: &HashMap<String, String>) -> WriterProperties {
        let compression = Compression::ZSTD(
            ZstdLevel::try_new(self.compression_level).unwrap_or_default(),
        );

        // Bin contents are mostly distinct floats
        let builder = WriterProperties::builder()
            .set_compression(compression)
            .set_statistics_enabled(EnabledStatistics::Chunk)
            .set_max_row_group_size(self.row_group_size)
            .set_column_dictionary_enabled(
                parquet::schema::types::ColumnPath::new(vec![
                    histogram_columns::CONTENTS.to_string(),
                ]),
                false,
            );

        let kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();

        builder.set_key_value_metadata(Some(kv_metadata)).build()
    }
}

/// Streaming writer for histogram artifacts
pub struct HistogramWriter<W: Write + Send> {
    writer: ArrowWriter<W>,
    schema: Arc<Schema>,
    names: HashSet<String>,
    bins_written: usize,
    entries_written: u64,
}

impl HistogramWriter<File> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        source: &str,
        config: HistogramWriterConfig,
    ) -> Result<Self, ArtifactError> {
        let file = File::create(path)?;
        Self::new(file, source, config)
    }
}

impl<W: Write + Send> HistogramWriter<W> {
    /// Create a new writer; `source` names the inputs the histograms were filled from.
    pub fn new(writer: W, source: &str, config: HistogramWriterConfig) -> Result<Self, ArtifactError> {
        let schema = create_histogram_schema_arc();

        let mut metadata = HashMap::new();
        metadata.insert(KEY_FORMAT_VERSION.to_string(), ARTIFACT_FORMAT_VERSION.to_string());
        metadata.insert(KEY_CREATED.to_string(), chrono::Utc::now().to_rfc3339());
        metadata.insert(KEY_SOURCE.to_string(), source.to_string());
        let props = config.to_writer_properties(&metadata);

        let arrow_writer = ArrowWriter::try_new(writer, schema.clone(), Some(props))?;

        Ok(Self {
            writer: arrow_writer,
            schema,
            names: HashSet::new(),
            bins_written: 0,
            entries_written: 0,
        })
    }

    /// Write a batch of histograms; keys must be unique within the file.
    pub fn write_histograms(&mut self, histograms: &[Histogram1D]) -> Result<(), ArtifactError> {
        if histograms.is_empty() {
            return Ok(());
        }

        let mut batch_names = HashSet::new();
        for hist in histograms {
            if self.names.contains(hist.name()) || !batch_names.insert(hist.name()) {
                return Err(ArtifactError::DuplicateHistogram(hist.name().to_string()));
            }
        }

        let mut name_builder = StringBuilder::with_capacity(histograms.len(), 256);
        let mut lo_builder = Float64Builder::with_capacity(histograms.len());
        let mut hi_builder = Float64Builder::with_capacity(histograms.len());
        let mut n_bins_builder = UInt32Builder::with_capacity(histograms.len());
        let mut entries_builder = UInt64Builder::with_capacity(histograms.len());
        let contents_field = Arc::new(Field::new("item", DataType::Float64, false));
        let mut contents_builder = ListBuilder::new(Float64Builder::new()).with_field(contents_field);

        for hist in histograms {
            let n_bins = u32::try_from(hist.n_bins()).map_err(|_| {
                ArtifactError::InvalidFormat(format!(
                    "{} has too many bins ({})",
                    hist.name(),
                    hist.n_bins()
                ))
            })?;

            name_builder.append_value(hist.name());
            lo_builder.append_value(hist.lo());
            hi_builder.append_value(hist.hi());
            n_bins_builder.append_value(n_bins);
            entries_builder.append_value(hist.entries());
            contents_builder.values().append_slice(hist.contents());
            contents_builder.append(true);
        }

        let arrays: Vec<ArrayRef> = vec![
            Arc::new(name_builder.finish()),
            Arc::new(lo_builder.finish()),
            Arc::new(hi_builder.finish()),
            Arc::new(n_bins_builder.finish()),
            Arc::new(entries_builder.finish()),
            Arc::new(contents_builder.finish()),
        ];

        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.writer.write(&batch)?;

        for hist in histograms {
            debug!("Wrote histogram {} ({} entries)", hist.name(), hist.entries());
            self.names.insert(hist.name().to_string());
            self.bins_written += hist.n_bins();
            self.entries_written += hist.entries();
        }
        Ok(())
    }

    /// Write a single histogram
    pub fn write_histogram(&mut self, hist: &Histogram1D) -> Result<(), ArtifactError> {
        self.write_histograms(std::slice::from_ref(hist))
    }

    /// Flush buffered rows and finalize the file
    pub fn finish(self) -> Result<ArtifactStats, ArtifactError> {
        let file_metadata = self.writer.close()?;

        Ok(ArtifactStats {
            histograms_written: self.names.len(),
            bins_written: self.bins_written,
            entries_written: self.entries_written,
            row_groups_written: file_metadata.row_groups.len(),
        })
    }

    /// Finalize and return the inner writer (for buffer extraction)
    pub fn finish_into_inner(self) -> Result<W, ArtifactError> {
        Ok(self.writer.into_inner()?)
    }
}

/// Statistics from a completed artifact write
#[derive(Debug, Clone)]
pub struct ArtifactStats {
    /// Histograms written
    pub histograms_written: usize,
    /// Bins over all histograms
    pub bins_written: usize,
    /// Fills over all histograms
    pub entries_written: u64,
    /// Parquet row groups in the file
    pub row_groups_written: usize,
}

impl std::fmt::Display for ArtifactStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wrote {} histograms ({} bins, {} entries) in {} row groups",
            self.histograms_written, self.bins_written, self.entries_written, self.row_groups_written
        )
    }
}
