//! HTTP implementation of the ingestion transport, backed by reqwest.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE};
use tokio_util::io::ReaderStream;
use tracing::{debug, info};
use uuid::Uuid;

use super::{ConnectionConfig, IngestTransport, TransportError};
use crate::descriptors::ByteStream;
use crate::properties::DataFormat;
use crate::result::IngestionResult;

/// Streams request bodies to the `/v1/rest/ingest` endpoint of the engine.
pub struct HttpIngestTransport {
    config: ConnectionConfig,
    client: reqwest::Client,
}

impl HttpIngestTransport {
    pub fn new(config: ConnectionConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(HttpIngestTransport { config, client })
    }

    fn ingest_url(
        &self,
        database: &str,
        table: &str,
        format: DataFormat,
        mapping_reference: Option<&str>,
    ) -> Result<reqwest::Url, TransportError> {
        let mut url = reqwest::Url::parse(&self.config.engine_endpoint)
            .map_err(|e| TransportError::Endpoint(e.to_string()))?;
        // Append as proper path segments so names containing `/`, `?` or `#`
        // are percent-encoded instead of changing the request target.
        url.path_segments_mut()
            .map_err(|_| TransportError::Endpoint("endpoint cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(["v1", "rest", "ingest", database, table]);
        url.query_pairs_mut()
            .append_pair("streamFormat", format.as_wire_str());
        if let Some(mapping) = mapping_reference {
            url.query_pairs_mut().append_pair("mappingName", mapping);
        }
        Ok(url)
    }
}

#[async_trait]
impl IngestTransport for HttpIngestTransport {
    async fn execute_streaming_ingest(
        &self,
        database: &str,
        table: &str,
        body: ByteStream,
        format: DataFormat,
        source_id: Uuid,
        mapping_reference: Option<&str>,
    ) -> Result<IngestionResult, TransportError> {
        let url = self.ingest_url(database, table, format, mapping_reference)?;
        debug!(%url, %source_id, "posting streaming ingest request");

        let mut request = self
            .client
            .post(url)
            .header(CONTENT_ENCODING, "gzip")
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(reqwest::Body::wrap_stream(ReaderStream::new(body)));
        if let Some(authorization) = &self.config.authorization {
            request = request.header(AUTHORIZATION, authorization.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        info!(database, table, %source_id, "streaming ingest accepted");
        Ok(IngestionResult::success(database, table, source_id))
    }
}
