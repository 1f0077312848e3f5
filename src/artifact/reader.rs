use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

use arrow::array::{Array, Float64Array, ListArray, StringArray, UInt32Array, UInt64Array};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;

use crate::histogram::Histogram1D;
use crate::schema::{
    histogram_columns, validate_histogram_schema, KEY_CREATED, KEY_FORMAT_VERSION, KEY_SOURCE,
};

use super::ArtifactError;

/// All histograms of one artifact, keyed by name
#[derive(Debug, Clone)]
pub struct HistogramFile {
    histograms: BTreeMap<String, Histogram1D>,
    key_value_metadata: HashMap<String, String>,
}

impl HistogramFile {
    /// Load an artifact from disk
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let path = path.as_ref();
        let file = Self::load(File::open(path)?)?;
        debug!("Loaded {} histograms from {}", file.len(), path.display());
        Ok(file)
    }

    /// Load an artifact from an in-memory Parquet buffer
    pub fn from_bytes(bytes: Bytes) -> Result<Self, ArtifactError> {
        Self::load(bytes)
    }

    fn load<T: ChunkReader + 'static>(source: T) -> Result<Self, ArtifactError> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(source)?;
        validate_histogram_schema(builder.schema())?;

        let mut key_value_metadata = HashMap::new();
        if let Some(kv_list) = builder.metadata().file_metadata().key_value_metadata() {
            for kv in kv_list {
                if let Some(value) = &kv.value {
                    key_value_metadata.insert(kv.key.clone(), value.clone());
                }
            }
        }

        let mut histograms = BTreeMap::new();
        for batch in builder.build()? {
            for hist in decode_batch(&batch?)? {
                let name = hist.name().to_string();
                if histograms.insert(name.clone(), hist).is_some() {
                    return Err(ArtifactError::DuplicateHistogram(name));
                }
            }
        }

        Ok(Self {
            histograms,
            key_value_metadata,
        })
    }

    /// Histogram stored under `key`
    pub fn get(&self, key: &str) -> Option<&Histogram1D> {
        self.histograms.get(key)
    }

    /// Stored keys in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.histograms.keys().map(String::as_str)
    }

    /// All histograms in key order
    pub fn histograms(&self) -> impl Iterator<Item = &Histogram1D> + '_ {
        self.histograms.values()
    }

    /// Number of histograms
    pub fn len(&self) -> usize {
        self.histograms.len()
    }

    /// Whether the artifact holds no histogram
    pub fn is_empty(&self) -> bool {
        self.histograms.is_empty()
    }

    /// Raw key-value metadata from the Parquet footer
    pub fn key_value_metadata(&self) -> &HashMap<String, String> {
        &self.key_value_metadata
    }

    /// Format version recorded by the writer
    pub fn format_version(&self) -> &str {
        self.metadata_value(KEY_FORMAT_VERSION).unwrap_or("unknown")
    }

    /// Creation timestamp (RFC 3339)
    pub fn created(&self) -> Option<&str> {
        self.metadata_value(KEY_CREATED)
    }

    /// Inputs the histograms were filled from
    pub fn source(&self) -> Option<&str> {
        self.metadata_value(KEY_SOURCE)
    }

    fn metadata_value(&self, key: &str) -> Option<&str> {
        self.key_value_metadata.get(key).map(String::as_str)
    }

    /// Take ownership of the histograms
    pub fn into_histograms(self) -> BTreeMap<String, Histogram1D> {
        self.histograms
    }
}

fn column<'a, T: Array + 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T, ArtifactError> {
    batch
        .column_by_name(name)
        .ok_or_else(|| ArtifactError::InvalidFormat(format!("Column not found: {}", name)))?
        .as_any()
        .downcast_ref::<T>()
        .ok_or_else(|| ArtifactError::InvalidFormat(format!("{} has an unexpected type", name)))
}

fn decode_batch(batch: &RecordBatch) -> Result<Vec<Histogram1D>, ArtifactError> {
    let names = column::<StringArray>(batch, histogram_columns::NAME)?;
    let los = column::<Float64Array>(batch, histogram_columns::LO)?;
    let his = column::<Float64Array>(batch, histogram_columns::HI)?;
    let n_bins = column::<UInt32Array>(batch, histogram_columns::N_BINS)?;
    let entries = column::<UInt64Array>(batch, histogram_columns::ENTRIES)?;
    let contents = column::<ListArray>(batch, histogram_columns::CONTENTS)?;

    let mut histograms = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        if names.is_null(row) || contents.is_null(row) {
            return Err(ArtifactError::InvalidFormat(format!("null histogram in row {}", row)));
        }
        let name = names.value(row).to_string();

        let values = contents.value(row);
        let values = values
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| ArtifactError::InvalidFormat(format!("{} contents are not Float64", name)))?;

        let declared = n_bins.value(row) as usize;
        if declared != values.len() {
            return Err(ArtifactError::BinCountMismatch {
                name,
                declared,
                stored: values.len(),
            });
        }

        let hist = Histogram1D::from_contents(
            name.clone(),
            los.value(row),
            his.value(row),
            values.values().to_vec(),
            entries.value(row),
        )
        .map_err(|source| ArtifactError::InvalidHistogram { name, source })?;
        histograms.push(hist);
    }
    Ok(histograms)
}
