use std::io::Cursor;

use bytes::Bytes;

use super::*;
use crate::histogram::Histogram1D;

fn filled(name: &str, n_bins: usize, values: &[f64]) -> Histogram1D {
    let mut hist = Histogram1D::new(name, n_bins, -1.0, 1.0).unwrap();
    hist.fill_all(values.iter().copied());
    hist
}

fn to_bytes(histograms: &[Histogram1D]) -> Bytes {
    let mut writer =
        HistogramWriter::new(Vec::new(), "events.parquet", HistogramWriterConfig::default()).unwrap();
    writer.write_histograms(histograms).unwrap();
    Bytes::from(writer.finish_into_inner().unwrap())
}

#[test]
fn test_write_then_read_histograms() {
    let res = filled("muons_res_p", 100, &[-0.5, 0.0, 0.0, 0.25, 3.0]);
    let p = filled("muons_p", 10, &[0.1, 0.2]);

    let file = HistogramFile::from_bytes(to_bytes(&[res.clone(), p.clone()])).unwrap();

    assert_eq!(file.len(), 2);
    assert_eq!(file.names().collect::<Vec<_>>(), vec!["muons_p", "muons_res_p"]);
    assert_eq!(file.get("muons_res_p"), Some(&res));
    assert_eq!(file.get("muons_p"), Some(&p));
    assert!(file.get("qq_res").is_none());

    assert_eq!(file.format_version(), crate::schema::ARTIFACT_FORMAT_VERSION);
    assert_eq!(file.source(), Some("events.parquet"));
    assert!(file.created().is_some());
}

#[test]
fn test_writer_stats() -> Result<(), ArtifactError> {
    let buffer = Cursor::new(Vec::new());
    let mut writer = HistogramWriter::new(buffer, "stats", HistogramWriterConfig::default())?;

    writer.write_histogram(&filled("a", 20, &[0.0, 0.1]))?;
    writer.write_histograms(&[filled("b", 30, &[0.5])])?;
    writer.write_histograms(&[])?;

    let stats = writer.finish()?;
    assert_eq!(stats.histograms_written, 2);
    assert_eq!(stats.bins_written, 50);
    assert_eq!(stats.entries_written, 3);
    assert!(stats.to_string().contains("2 histograms"));
    Ok(())
}

#[test]
fn test_duplicate_keys_are_rejected() {
    let mut writer =
        HistogramWriter::new(Vec::new(), "dup", HistogramWriterConfig::default()).unwrap();
    writer.write_histogram(&filled("a", 10, &[])).unwrap();

    assert!(matches!(
        writer.write_histogram(&filled("a", 10, &[])),
        Err(ArtifactError::DuplicateHistogram(name)) if name == "a"
    ));
    assert!(matches!(
        writer.write_histograms(&[filled("b", 10, &[]), filled("b", 10, &[])]),
        Err(ArtifactError::DuplicateHistogram(_))
    ));
}

#[test]
fn test_open_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sample.hist.parquet");
    let hist = filled("qq_res", 1000, &[0.01, -0.02, 0.005]);

    let mut writer =
        HistogramWriter::new_file(&path, "disk", HistogramWriterConfig::default()).unwrap();
    writer.write_histogram(&hist).unwrap();
    writer.finish().unwrap();

    let file = HistogramFile::open(&path).unwrap();
    assert_eq!(file.into_histograms().remove("qq_res"), Some(hist));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        HistogramFile::open(dir.path().join("absent.parquet")),
        Err(ArtifactError::IoError(_))
    ));
}

#[test]
fn test_event_file_is_not_an_artifact() {
    let mut writer = crate::events::EventWriter::new(
        Vec::new(),
        "events",
        crate::events::EventWriterConfig::default(),
    )
    .unwrap();
    writer.write_events(&[crate::events::Event::new(1)]).unwrap();
    let bytes = Bytes::from(writer.finish_into_inner().unwrap());

    assert!(matches!(
        HistogramFile::from_bytes(bytes),
        Err(ArtifactError::SchemaError(_))
    ));
}

#[test]
fn test_empty_artifact() {
    let file = HistogramFile::from_bytes(to_bytes(&[])).unwrap();
    assert!(file.is_empty());
}
