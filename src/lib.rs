//! Streaming Ingest SDK - client library for streaming ingestion
//!
//! Pushes byte streams and files into a remote analytics data-store table
//! over the streaming ingestion protocol. Provides:
//! - Ingestion properties with field-level default/override merging
//! - Source descriptors (stream, file) with declared compression state
//! - A streaming ingest client handling validation, gzip compression and
//!   mapping-requirement enforcement
//! - A pluggable transport seam (HTTP implementation behind `http-transport`)

pub mod client;
pub mod descriptors;
pub mod properties;
pub mod result;
pub mod transport;

// Re-export commonly used types
pub use client::{IngestError, StreamingIngestClient};
pub use descriptors::{ByteStream, CompressionType, FileDescriptor, StreamDescriptor};
pub use properties::{DataFormat, EffectiveProperties, IngestionProperties, PropertyError};
pub use result::{IngestionResult, IngestionStatus};
#[cfg(feature = "http-transport")]
pub use transport::HttpIngestTransport;
pub use transport::{ConnectionConfig, IngestTransport, TransportError};
