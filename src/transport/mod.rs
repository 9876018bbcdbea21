//! Transport abstraction for the streaming ingestion endpoint.
//!
//! The client never talks to the network itself; it hands a fully prepared
//! request (target table, compressed byte stream, format, mapping reference)
//! to an [`IngestTransport`]. The default implementation is the
//! reqwest-backed [`http::HttpIngestTransport`], enabled by the
//! `http-transport` feature; tests substitute recording fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::descriptors::ByteStream;
use crate::properties::DataFormat;
use crate::result::IngestionResult;

#[cfg(feature = "http-transport")]
pub mod http;

#[cfg(feature = "http-transport")]
pub use self::http::HttpIngestTransport;

/// Error type for transport operations.
///
/// The client forwards these unchanged; it performs no retry and no
/// interpretation of service failures.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The configured ingestion endpoint could not be used
    #[error("invalid ingestion endpoint: {0}")]
    Endpoint(String),

    /// The HTTP request itself failed (connect, timeout, body streaming)
    #[cfg(feature = "http-transport")]
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-success status
    #[error("ingestion rejected by service (status {status}): {message}")]
    Rejected { status: u16, message: String },

    /// Any other transport-level failure
    #[error("transport failure: {0}")]
    Other(String),
}

/// Connection settings for the ingestion endpoint.
///
/// Authentication flows are out of scope; `authorization`, when set, is sent
/// verbatim as the `Authorization` header value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Base URI of the engine endpoint, e.g. `https://ingest.example.com`
    pub engine_endpoint: String,
    /// Pre-built `Authorization` header value, passed through verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout_secs() -> u64 {
    600
}

impl ConnectionConfig {
    pub fn new(engine_endpoint: impl Into<String>) -> Self {
        ConnectionConfig {
            engine_endpoint: engine_endpoint.into(),
            authorization: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }

    pub fn with_authorization(mut self, authorization: impl Into<String>) -> Self {
        self.authorization = Some(authorization.into());
        self
    }
}

/// Executes the actual network call of a streaming ingestion.
///
/// `body` is the canonical prepared stream: already gzip-compressed by the
/// client (or declared as such by the caller). Implementations must consume
/// it exactly once and report the outcome through the returned future.
#[async_trait]
pub trait IngestTransport: Send + Sync {
    async fn execute_streaming_ingest(
        &self,
        database: &str,
        table: &str,
        body: ByteStream,
        format: DataFormat,
        source_id: Uuid,
        mapping_reference: Option<&str>,
    ) -> Result<IngestionResult, TransportError>;
}
