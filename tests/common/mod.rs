//! Shared test doubles and helpers for the ingestion tests.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};
use uuid::Uuid;

use streaming_ingest_sdk::{
    ByteStream, DataFormat, IngestTransport, IngestionResult, TransportError,
};

/// One fully recorded transport invocation, body drained into memory.
#[derive(Debug, Clone)]
pub struct RecordedIngest {
    pub database: String,
    pub table: String,
    pub format: DataFormat,
    pub source_id: Uuid,
    pub mapping_reference: Option<String>,
    pub body: Vec<u8>,
}

/// Transport double that records every call instead of hitting the network.
#[derive(Default, Clone)]
pub struct RecordingTransport {
    calls: Arc<Mutex<Vec<RecordedIngest>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedIngest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl IngestTransport for RecordingTransport {
    async fn execute_streaming_ingest(
        &self,
        database: &str,
        table: &str,
        mut body: ByteStream,
        format: DataFormat,
        source_id: Uuid,
        mapping_reference: Option<&str>,
    ) -> Result<IngestionResult, TransportError> {
        // Drain in chunks rather than read_to_end: the gzip encoder can emit
        // bytes and fail in the same poll, which read_to_end's debug
        // assertions in tokio reject.
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = body
                .read(&mut chunk)
                .await
                .map_err(|e| TransportError::Other(e.to_string()))?;
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
        }
        self.calls.lock().unwrap().push(RecordedIngest {
            database: database.to_string(),
            table: table.to_string(),
            format,
            source_id,
            mapping_reference: mapping_reference.map(str::to_string),
            body: buf,
        });
        Ok(IngestionResult::success(database, table, source_id))
    }
}

/// Transport double that always rejects, for pass-through assertions.
pub struct FailingTransport;

#[async_trait]
impl IngestTransport for FailingTransport {
    async fn execute_streaming_ingest(
        &self,
        _database: &str,
        _table: &str,
        _body: ByteStream,
        _format: DataFormat,
        _source_id: Uuid,
        _mapping_reference: Option<&str>,
    ) -> Result<IngestionResult, TransportError> {
        Err(TransportError::Rejected {
            status: 400,
            message: "bad request".to_string(),
        })
    }
}

/// Source that serves its payload once, then fails mid-read.
pub struct InterruptedReader {
    payload: Vec<u8>,
    served: bool,
}

impl InterruptedReader {
    pub fn new(payload: impl Into<Vec<u8>>) -> Self {
        InterruptedReader {
            payload: payload.into(),
            served: false,
        }
    }
}

impl AsyncRead for InterruptedReader {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        let this = self.get_mut();
        if this.served {
            Poll::Ready(Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "source stream interrupted",
            )))
        } else {
            this.served = true;
            buf.put_slice(&this.payload);
            Poll::Ready(Ok(()))
        }
    }
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

pub fn gunzip(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .unwrap();
    out
}
