//! Acknowledgement returned by a completed ingestion.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the ingestion was accepted by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestionStatus {
    /// The data was streamed directly into the target table.
    Success,
    /// The data was accepted for deferred processing.
    Queued,
}

/// The result of an ingestion, as reported by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionResult {
    pub status: IngestionStatus,
    /// Database the data landed in.
    pub database: String,
    /// Table the data landed in.
    pub table: String,
    /// Source id of the ingested descriptor.
    pub source_id: Uuid,
}

impl IngestionResult {
    pub fn new(status: IngestionStatus, database: &str, table: &str, source_id: Uuid) -> Self {
        IngestionResult {
            status,
            database: database.to_string(),
            table: table.to_string(),
            source_id,
        }
    }

    /// Successful streaming ingestion into `database`.`table`.
    pub fn success(database: &str, table: &str, source_id: Uuid) -> Self {
        IngestionResult::new(IngestionStatus::Success, database, table, source_id)
    }
}
