use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float32Builder, Int32Builder, Int64Builder, ListBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;

use crate::particle::ParticleRecord;
use crate::schema::{create_event_schema_arc, KEY_CREATED, KEY_SOURCE};

use super::{Event, EventError};

/// Configuration for the event writer
#[derive(Debug, Clone)]
pub struct EventWriterConfig {
    /// ZSTD compression level
    pub compression_level: i32,

    /// Target row group size in events
    pub row_group_size: usize,
}

impl Default for EventWriterConfig {
    fn default() -> Self {
        Self {
            compression_level: 3,
            row_group_size: 10_000,
        }
    }
}

impl EventWriterConfig {
    fn to_writer_properties(&self, metadata: &HashMap<String, String>) -> WriterProperties {
        let compression = Compression::ZSTD(
            ZstdLevel::try_new(self.compression_level).unwrap_or_default(),
        );

        let kv_metadata: Vec<KeyValue> = metadata
            .iter()
            .map(|(k, v)| KeyValue {
                key: k.clone(),
                value: Some(v.clone()),
            })
            .collect();

        WriterProperties::builder()
            .set_compression(compression)
            .set_max_row_group_size(self.row_group_size)
            .set_key_value_metadata(Some(kv_metadata))
            .build()
    }
}

/// Streaming writer for event Parquet files
pub struct EventWriter<W: Write + Send> {
    writer: ArrowWriter<W>,
    schema: Arc<Schema>,
    events_written: usize,
    particles_written: usize,
}

impl EventWriter<File> {
    /// Create a new writer to a file path
    pub fn new_file<P: AsRef<Path>>(
        path: P,
        source: &str,
        config: EventWriterConfig,
    ) -> Result<Self, EventError> {
        let file = File::create(path)?;
        Self::new(file, source, config)
    }
}

impl<W: Write + Send> EventWriter<W> {
    /// Create a new writer; `source` describes where the events come from.
    pub fn new(writer: W, source: &str, config: EventWriterConfig) -> Result<Self, EventError> {
        let schema = create_event_schema_arc();

        let mut metadata = HashMap::new();
        metadata.insert(KEY_CREATED.to_string(), chrono::Utc::now().to_rfc3339());
        metadata.insert(KEY_SOURCE.to_string(), source.to_string());
        let props = config.to_writer_properties(&metadata);

        let arrow_writer = ArrowWriter::try_new(writer, schema.clone(), Some(props))?;

        Ok(Self {
            writer: arrow_writer,
            schema,
            events_written: 0,
            particles_written: 0,
        })
    }

    /// Write a batch of events
    pub fn write_events(&mut self, events: &[Event]) -> Result<(), EventError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut numbers = Int64Builder::with_capacity(events.len());
        for event in events {
            numbers.append_value(event.number);
        }

        let mut arrays: Vec<ArrayRef> = vec![Arc::new(numbers.finish())];
        for collection in [Collection::Reco, Collection::Truth] {
            arrays.push(float_list(events, collection, |p| p.px));
            arrays.push(float_list(events, collection, |p| p.py));
            arrays.push(float_list(events, collection, |p| p.pz));
            arrays.push(float_list(events, collection, |p| p.energy));
            arrays.push(float_list(events, collection, |p| p.charge));
        }
        arrays.push(int_list(events, |e| {
            e.truth.iter().map(|p| p.generator_status).collect()
        }));
        arrays.push(int_list(events, |e| e.associations.reco_index().to_vec()));
        arrays.push(int_list(events, |e| e.associations.truth_index().to_vec()));
        arrays.push(int_list(events, |e| e.muons.clone()));

        let batch = RecordBatch::try_new(self.schema.clone(), arrays)?;
        self.writer.write(&batch)?;

        self.events_written += events.len();
        self.particles_written += events.iter().map(Event::particle_count).sum::<usize>();
        Ok(())
    }

    /// Flush buffered rows and finalize the file
    pub fn finish(self) -> Result<EventWriterStats, EventError> {
        let file_metadata = self.writer.close()?;

        Ok(EventWriterStats {
            events_written: self.events_written,
            particles_written: self.particles_written,
            row_groups_written: file_metadata.row_groups.len(),
        })
    }

    /// Finalize and return the inner writer (for buffer extraction)
    pub fn finish_into_inner(self) -> Result<W, EventError> {
        Ok(self.writer.into_inner()?)
    }
}

#[derive(Clone, Copy)]
enum Collection {
    Reco,
    Truth,
}

impl Collection {
    fn of(self, event: &Event) -> &[ParticleRecord] {
        match self {
            Collection::Reco => &event.reco,
            Collection::Truth => &event.truth,
        }
    }
}

fn float_list<F>(events: &[Event], collection: Collection, value: F) -> ArrayRef
where
    F: Fn(&ParticleRecord) -> f32,
{
    let field = Arc::new(Field::new("item", DataType::Float32, false));
    let mut builder = ListBuilder::new(Float32Builder::new()).with_field(field);
    for event in events {
        for particle in collection.of(event) {
            builder.values().append_value(value(particle));
        }
        builder.append(true);
    }
    Arc::new(builder.finish())
}

fn int_list<F>(events: &[Event], values: F) -> ArrayRef
where
    F: Fn(&Event) -> Vec<i32>,
{
    let field = Arc::new(Field::new("item", DataType::Int32, false));
    let mut builder = ListBuilder::new(Int32Builder::new()).with_field(field);
    for event in events {
        for value in values(event) {
            builder.values().append_value(value);
        }
        builder.append(true);
    }
    Arc::new(builder.finish())
}

/// Statistics from a completed event write
#[derive(Debug, Clone)]
pub struct EventWriterStats {
    /// Rows written
    pub events_written: usize,
    /// Reconstructed plus generated particles written
    pub particles_written: usize,
    /// Parquet row groups in the file
    pub row_groups_written: usize,
}

impl std::fmt::Display for EventWriterStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Wrote {} events ({} particles) in {} row groups",
            self.events_written, self.particles_written, self.row_groups_written
        )
    }
}
