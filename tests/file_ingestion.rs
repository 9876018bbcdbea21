//! End-to-end tests for the file ingestion path.

mod common;

use common::{RecordingTransport, gunzip, gzip};
use streaming_ingest_sdk::{
    DataFormat, FileDescriptor, IngestError, IngestionProperties, StreamingIngestClient,
};

fn csv_props() -> IngestionProperties {
    IngestionProperties {
        database: Some("telemetry".into()),
        table: Some("events".into()),
        data_format: Some(DataFormat::Csv),
        ..Default::default()
    }
}

#[tokio::test]
async fn plain_files_are_compressed_on_the_way_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.csv");
    let content = b"a,b\n1,2\n3,4\n";
    std::fs::write(&path, content).unwrap();

    let transport = RecordingTransport::new();
    let client = StreamingIngestClient::new(transport.clone(), csv_props());
    client
        .ingest_from_file(FileDescriptor::new(&path), None)
        .await
        .unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(gunzip(&calls[0].body), content);
}

#[tokio::test]
async fn zipped_files_pass_through_without_recompression() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.csv.gz");
    let compressed = gzip(b"a,b\n1,2\n");
    std::fs::write(&path, &compressed).unwrap();

    let transport = RecordingTransport::new();
    let client = StreamingIngestClient::new(transport.clone(), csv_props());
    client
        .ingest_from_file(FileDescriptor::new(&path).zipped(true), None)
        .await
        .unwrap();

    assert_eq!(transport.calls()[0].body, compressed);
}

#[tokio::test]
async fn raw_paths_wrap_as_plain_file_descriptors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.csv");
    std::fs::write(&path, b"a,b\n").unwrap();

    let transport = RecordingTransport::new();
    let client = StreamingIngestClient::new(transport.clone(), csv_props());
    client
        .ingest_from_file(path.as_path(), None)
        .await
        .unwrap();

    assert_eq!(gunzip(&transport.calls()[0].body), b"a,b\n");
}

#[tokio::test]
async fn file_source_id_is_carried_through_to_the_result() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.csv");
    std::fs::write(&path, b"a,b\n").unwrap();

    let source_id = uuid::Uuid::new_v4();
    let transport = RecordingTransport::new();
    let client = StreamingIngestClient::new(transport.clone(), csv_props());
    let result = client
        .ingest_from_file(
            FileDescriptor::new(&path).with_source_id(source_id),
            None,
        )
        .await
        .unwrap();

    assert_eq!(result.source_id, source_id);
    assert_eq!(transport.calls()[0].source_id, source_id);
}

#[tokio::test]
async fn missing_files_report_a_resource_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.csv");

    let transport = RecordingTransport::new();
    let client = StreamingIngestClient::new(transport.clone(), csv_props());
    let err = client
        .ingest_from_file(FileDescriptor::new(&path), None)
        .await
        .unwrap_err();

    match err {
        IngestError::Resource { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected resource error, got {other}"),
    }
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn invalid_properties_fail_before_the_file_is_touched() {
    // The path does not exist; validation must fail first.
    let transport = RecordingTransport::new();
    let client = StreamingIngestClient::new(transport.clone(), IngestionProperties::default());
    let err = client
        .ingest_from_file("does-not-exist.csv", None)
        .await
        .unwrap_err();

    assert!(matches!(err, IngestError::Configuration(_)));
    assert_eq!(transport.call_count(), 0);
}
