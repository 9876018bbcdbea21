//! Streaming ingestion client: the orchestration core.
//!
//! For every call the client resolves effective properties (client defaults
//! merged with per-call overrides), validates them, normalizes the source
//! into a canonical stream descriptor, decides whether to gzip, enforces the
//! mapping requirement of semi-structured formats, and only then hands the
//! prepared request to the transport. Each step runs strictly after the
//! previous one succeeded; the transport is never invoked on a local failure.
//!
//! All failures (validation, mapping, file access, transport) are reported
//! through the returned future, never by panicking out of an entry point.

use std::io;
use std::path::PathBuf;

use async_compression::tokio::bufread::GzipEncoder;
use thiserror::Error;
use tokio::io::BufReader;
use tracing::{debug, warn};

use crate::descriptors::{ByteStream, CompressionType, FileDescriptor, StreamDescriptor};
use crate::properties::{DataFormat, EffectiveProperties, IngestionProperties, PropertyError};
use crate::result::IngestionResult;
use crate::transport::{IngestTransport, TransportError};

/// Error type for ingestion calls.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The merged properties failed validation; the transport was not invoked
    #[error("invalid ingestion properties: {0}")]
    Configuration(#[from] PropertyError),

    /// The resolved format needs a mapping reference and none was supplied;
    /// the transport was not invoked
    #[error("mapping reference required for format {format}")]
    MappingRequired { format: DataFormat },

    /// The source file could not be opened
    #[error("failed to open source file {path}: {source}")]
    Resource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The transport reported a failure, forwarded unchanged
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Client for ingesting byte streams and files into a remote analytics table.
///
/// Generic over the [`IngestTransport`] that performs the network call.
/// Default properties are immutable after construction, so a single client
/// can be shared freely across concurrent ingestion calls; each call owns its
/// descriptor and shares no per-call state with others.
pub struct StreamingIngestClient<T: IngestTransport> {
    transport: T,
    default_props: IngestionProperties,
}

impl<T: IngestTransport> StreamingIngestClient<T> {
    /// Create a client with the given transport and client-level default
    /// properties. Pass `IngestionProperties::default()` for no defaults.
    pub fn new(transport: T, default_props: IngestionProperties) -> Self {
        StreamingIngestClient {
            transport,
            default_props,
        }
    }

    /// Ingest a byte stream.
    ///
    /// Accepts anything convertible into a [`StreamDescriptor`]; raw streams
    /// wrap as uncompressed descriptors with a fresh source id. A descriptor
    /// tagged [`CompressionType::None`] is gzip-compressed on the way to the
    /// transport; any other tag is trusted and passed through untouched.
    pub async fn ingest_from_stream<S>(
        &self,
        source: S,
        properties: Option<&IngestionProperties>,
    ) -> Result<IngestionResult, IngestError>
    where
        S: Into<StreamDescriptor>,
    {
        let props = self.resolve_properties(properties)?;
        self.ingest_descriptor(source.into(), props).await
    }

    /// Ingest a file from disk.
    ///
    /// Accepts anything convertible into a [`FileDescriptor`]; raw paths wrap
    /// as plain (not zipped) descriptors. The file is opened asynchronously
    /// and ingested through the same path as [`ingest_from_stream`], with the
    /// descriptor's `zipped` flag deciding the compression tag.
    ///
    /// [`ingest_from_stream`]: StreamingIngestClient::ingest_from_stream
    pub async fn ingest_from_file<F>(
        &self,
        source: F,
        properties: Option<&IngestionProperties>,
    ) -> Result<IngestionResult, IngestError>
    where
        F: Into<FileDescriptor>,
    {
        let props = self.resolve_properties(properties)?;
        let file_descriptor = source.into();

        let file = tokio::fs::File::open(file_descriptor.path())
            .await
            .map_err(|source| IngestError::Resource {
                path: file_descriptor.path().to_path_buf(),
                source,
            })?;

        let descriptor = StreamDescriptor::with_source_id(file, file_descriptor.source_id())
            .with_compression(file_descriptor.compression_type());
        self.ingest_descriptor(descriptor, props).await
    }

    /// Merge client defaults with per-call overrides and validate the result.
    fn resolve_properties(
        &self,
        overrides: Option<&IngestionProperties>,
    ) -> Result<EffectiveProperties, IngestError> {
        let merged = match overrides {
            Some(overrides) => self.default_props.merged_with(overrides),
            None => self.default_props.clone(),
        };
        Ok(merged.resolve()?)
    }

    /// Shared tail of both entry points: mapping check, compression decision,
    /// transport dispatch. The descriptor's stream is dropped (released)
    /// without being read on the mapping-failure path.
    async fn ingest_descriptor(
        &self,
        descriptor: StreamDescriptor,
        props: EffectiveProperties,
    ) -> Result<IngestionResult, IngestError> {
        let (stream, source_id, compression_type) = descriptor.into_parts();

        if props.ingestion_mapping_reference.is_none()
            && props.data_format.requires_mapping_reference()
        {
            warn!(format = %props.data_format, "rejecting ingestion: no mapping reference");
            return Err(IngestError::MappingRequired {
                format: props.data_format,
            });
        }

        let body: ByteStream = match compression_type {
            CompressionType::None => Box::new(GzipEncoder::new(BufReader::new(stream))),
            CompressionType::Gzip => stream,
        };

        debug!(
            database = %props.database,
            table = %props.table,
            format = %props.data_format,
            %source_id,
            "dispatching streaming ingest"
        );
        self.transport
            .execute_streaming_ingest(
                &props.database,
                &props.table,
                body,
                props.data_format,
                source_id,
                props.ingestion_mapping_reference.as_deref(),
            )
            .await
            .map_err(IngestError::Transport)
    }
}
