use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ListArray};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;

use crate::association::AssociationTable;
use crate::particle::ParticleRecord;
use crate::schema::{event_columns, validate_event_schema};

use super::utils::{float32_row, get_int64_column, get_list_column, int32_row};
use super::{Event, EventError, EventSummary};

/// Configuration for reading event files
#[derive(Debug, Clone)]
pub struct EventReaderConfig {
    /// Number of events decoded per record batch
    pub batch_size: usize,
}

impl Default for EventReaderConfig {
    fn default() -> Self {
        Self { batch_size: 1024 }
    }
}

enum EventSource {
    FilePath(PathBuf),
    InMemory(Bytes),
}

/// Reader for event Parquet files
pub struct EventReader {
    source: EventSource,
    config: EventReaderConfig,
    num_events: usize,
    key_value_metadata: HashMap<String, String>,
}

impl EventReader {
    /// Open an event file with the default configuration
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, EventError> {
        Self::open_with_config(path, EventReaderConfig::default())
    }

    /// Open an event file
    ///
    /// The schema is validated up front; a file without the event columns is rejected
    /// before any row is decoded.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: EventReaderConfig,
    ) -> Result<Self, EventError> {
        let path = path.as_ref();
        let builder = ParquetRecordBatchReaderBuilder::try_new(File::open(path)?)?;
        let (num_events, key_value_metadata) = inspect(&builder)?;
        debug!("Opened {} ({} events)", path.display(), num_events);
        Ok(Self {
            source: EventSource::FilePath(path.to_path_buf()),
            config,
            num_events,
            key_value_metadata,
        })
    }

    /// Read events from an in-memory Parquet buffer
    pub fn from_bytes(bytes: Bytes) -> Result<Self, EventError> {
        let builder = ParquetRecordBatchReaderBuilder::try_new(bytes.clone())?;
        let (num_events, key_value_metadata) = inspect(&builder)?;
        Ok(Self {
            source: EventSource::InMemory(bytes),
            config: EventReaderConfig::default(),
            num_events,
            key_value_metadata,
        })
    }

    /// Replace the reader configuration
    pub fn with_config(mut self, config: EventReaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of events according to the file footer
    pub fn num_events(&self) -> usize {
        self.num_events
    }

    /// Raw key-value metadata from the Parquet footer
    pub fn key_value_metadata(&self) -> &HashMap<String, String> {
        &self.key_value_metadata
    }

    /// Streaming iterator over record batches
    pub fn iter_batches(&self) -> Result<EventBatchIterator, EventError> {
        match &self.source {
            EventSource::FilePath(path) => {
                let file = File::open(path)?;
                let reader = ParquetRecordBatchReaderBuilder::try_new(file)?
                    .with_batch_size(self.config.batch_size)
                    .build()?;
                Ok(EventBatchIterator::new(reader))
            }
            EventSource::InMemory(bytes) => {
                let reader = ParquetRecordBatchReaderBuilder::try_new(bytes.clone())?
                    .with_batch_size(self.config.batch_size)
                    .build()?;
                Ok(EventBatchIterator::new(reader))
            }
        }
    }

    /// Streaming iterator over decoded events.
    ///
    /// Memory usage is bounded by one record batch.
    pub fn events(&self) -> Result<EventIterator, EventError> {
        Ok(EventIterator {
            batches: self.iter_batches()?,
            current: Vec::new().into_iter(),
        })
    }

    /// Decode every event into memory
    pub fn read_all(&self) -> Result<Vec<Event>, EventError> {
        self.events()?.collect()
    }

    /// Count particles and associations over the whole file
    pub fn summary(&self) -> Result<EventSummary, EventError> {
        let mut summary = EventSummary::default();
        for event in self.events()? {
            summary.add(&event?);
        }
        Ok(summary)
    }
}

fn inspect<T: ChunkReader + 'static>(
    builder: &ParquetRecordBatchReaderBuilder<T>,
) -> Result<(usize, HashMap<String, String>), EventError> {
    validate_event_schema(builder.schema())?;

    let file_meta = builder.metadata().file_metadata();
    let num_events = usize::try_from(file_meta.num_rows())
        .map_err(|_| EventError::InvalidFormat("negative row count".to_string()))?;

    let mut kv_metadata = HashMap::new();
    if let Some(kv_list) = file_meta.key_value_metadata() {
        for kv in kv_list {
            if let Some(value) = &kv.value {
                kv_metadata.insert(kv.key.clone(), value.clone());
            }
        }
    }
    Ok((num_events, kv_metadata))
}

/// Streaming iterator over record batches
pub struct EventBatchIterator {
    inner: Box<dyn Iterator<Item = Result<RecordBatch, arrow::error::ArrowError>> + Send>,
}

impl EventBatchIterator {
    fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = Result<RecordBatch, arrow::error::ArrowError>> + Send + 'static,
    {
        Self {
            inner: Box::new(iter),
        }
    }
}

impl Iterator for EventBatchIterator {
    type Item = Result<RecordBatch, EventError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|r| r.map_err(EventError::from))
    }
}

/// Streaming iterator over events, decoding one batch at a time
pub struct EventIterator {
    batches: EventBatchIterator,
    current: std::vec::IntoIter<Event>,
}

impl Iterator for EventIterator {
    type Item = Result<Event, EventError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(event) = self.current.next() {
                return Some(Ok(event));
            }
            match self.batches.next()? {
                Ok(batch) => match decode_batch(&batch) {
                    Ok(events) => self.current = events.into_iter(),
                    Err(e) => return Some(Err(e)),
                },
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

struct CollectionColumns<'a> {
    names: [&'static str; 5],
    lists: [&'a ListArray; 5],
}

impl<'a> CollectionColumns<'a> {
    fn from_batch(batch: &'a RecordBatch, names: [&'static str; 5]) -> Result<Self, EventError> {
        Ok(Self {
            names,
            lists: [
                get_list_column(batch, names[0])?,
                get_list_column(batch, names[1])?,
                get_list_column(batch, names[2])?,
                get_list_column(batch, names[3])?,
                get_list_column(batch, names[4])?,
            ],
        })
    }

    /// Particles of one row; every column must match the length of the x component.
    fn read(&self, row: usize, event: i64) -> Result<Vec<ParticleRecord>, EventError> {
        let mut columns = Vec::with_capacity(5);
        for (list, name) in self.lists.iter().zip(self.names) {
            columns.push(float32_row(list, name, row)?);
        }

        let expected = columns[0].len();
        for (values, name) in columns.iter().zip(self.names) {
            if values.len() != expected {
                return Err(EventError::InconsistentEvent {
                    event,
                    column: name.to_string(),
                    expected,
                    found: values.len(),
                });
            }
        }

        Ok((0..expected)
            .map(|i| {
                ParticleRecord::from_momentum(columns[0][i], columns[1][i], columns[2][i])
                    .with_energy(columns[3][i])
                    .with_charge(columns[4][i])
            })
            .collect())
    }
}

fn decode_batch(batch: &RecordBatch) -> Result<Vec<Event>, EventError> {
    let numbers = get_int64_column(batch, event_columns::EVENT)?;
    let reco_columns = CollectionColumns::from_batch(batch, event_columns::RECO_FLOAT_COLUMNS)?;
    let truth_columns = CollectionColumns::from_batch(batch, event_columns::MC_FLOAT_COLUMNS)?;
    let status = get_list_column(batch, event_columns::MC_GENERATOR_STATUS)?;
    let assoc_reco = get_list_column(batch, event_columns::ASSOC_RECO_INDEX)?;
    let assoc_mc = get_list_column(batch, event_columns::ASSOC_MC_INDEX)?;
    let muons = get_list_column(batch, event_columns::MUON_INDEX)?;

    let mut events = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        let number = if numbers.is_null(row) {
            return Err(EventError::InvalidFormat(format!(
                "null {} in row {}",
                event_columns::EVENT,
                row
            )));
        } else {
            numbers.value(row)
        };

        let reco = reco_columns.read(row, number)?;
        let mut truth = truth_columns.read(row, number)?;

        let statuses = int32_row(status, event_columns::MC_GENERATOR_STATUS, row)?;
        if statuses.len() != truth.len() {
            return Err(EventError::InconsistentEvent {
                event: number,
                column: event_columns::MC_GENERATOR_STATUS.to_string(),
                expected: truth.len(),
                found: statuses.len(),
            });
        }
        for (particle, status) in truth.iter_mut().zip(statuses) {
            particle.generator_status = status;
        }

        let associations = AssociationTable::new(
            int32_row(assoc_reco, event_columns::ASSOC_RECO_INDEX, row)?,
            int32_row(assoc_mc, event_columns::ASSOC_MC_INDEX, row)?,
        )?;

        events.push(Event {
            number,
            reco,
            truth,
            associations,
            muons: int32_row(muons, event_columns::MUON_INDEX, row)?,
        });
    }
    Ok(events)
}
