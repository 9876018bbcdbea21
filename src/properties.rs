//! Ingestion properties: per-call and client-default configuration.
//!
//! Properties are deliberately sparse structs (every field optional) so that a
//! client-level default set and a per-call override set can be combined with a
//! field-level merge. Resolution never mutates either input: merging produces
//! a new value, and [`IngestionProperties::resolve`] turns a merged set into
//! an [`EffectiveProperties`] with the required fields proven present.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Data formats accepted by the streaming ingestion endpoint.
///
/// The serialized names double as the wire names sent to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    Csv,
    Tsv,
    Psv,
    Txt,
    Json,
    SingleJson,
    Avro,
    Orc,
    Parquet,
}

impl DataFormat {
    /// Wire name used in the `streamFormat` query parameter.
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            DataFormat::Csv => "csv",
            DataFormat::Tsv => "tsv",
            DataFormat::Psv => "psv",
            DataFormat::Txt => "txt",
            DataFormat::Json => "json",
            DataFormat::SingleJson => "singlejson",
            DataFormat::Avro => "avro",
            DataFormat::Orc => "orc",
            DataFormat::Parquet => "parquet",
        }
    }

    /// Whether the service needs a stored mapping reference to interpret this
    /// format. True exactly for the semi-structured/columnar formats
    /// JSON, SINGLEJSON, AVRO and ORC.
    pub fn requires_mapping_reference(&self) -> bool {
        matches!(
            self,
            DataFormat::Json | DataFormat::SingleJson | DataFormat::Avro | DataFormat::Orc
        )
    }
}

impl std::fmt::Display for DataFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire_str())
    }
}

/// Errors that can occur when resolving ingestion properties.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    /// No database name after merging defaults and overrides
    #[error("database name cannot be empty")]
    MissingDatabase,

    /// No table name after merging defaults and overrides
    #[error("table name cannot be empty")]
    MissingTable,

    /// No data format after merging defaults and overrides
    #[error("data format must be specified")]
    MissingFormat,
}

/// Customisation of a single ingestion call.
///
/// Every field is optional so a partially filled set can act either as a
/// client-level default or as a per-call override. The merge in
/// [`merged_with`](IngestionProperties::merged_with) is field-level: an
/// override only replaces the fields it actually carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionProperties {
    /// Name of the database to ingest into
    pub database: Option<String>,
    /// Name of the table to ingest into
    pub table: Option<String>,
    /// Format of the data being ingested
    pub data_format: Option<DataFormat>,
    /// Name of a stored schema mapping on the service side
    pub ingestion_mapping_reference: Option<String>,
    /// If set to `true`, any service-side aggregation is skipped
    pub flush_immediately: Option<bool>,
    /// Extent tags attached to the ingested data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_tags: Vec<String>,
}

impl IngestionProperties {
    /// True when no field carries a value.
    pub fn is_empty(&self) -> bool {
        self.database.is_none()
            && self.table.is_none()
            && self.data_format.is_none()
            && self.ingestion_mapping_reference.is_none()
            && self.flush_immediately.is_none()
            && self.additional_tags.is_empty()
    }

    /// Field-level merge of `self` (defaults) with `overrides`.
    ///
    /// Fields present in `overrides` win; fields absent there fall back to
    /// `self`. Neither input is mutated. When one side is empty the other is
    /// returned as-is.
    pub fn merged_with(&self, overrides: &IngestionProperties) -> IngestionProperties {
        if overrides.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return overrides.clone();
        }
        IngestionProperties {
            database: overrides.database.clone().or_else(|| self.database.clone()),
            table: overrides.table.clone().or_else(|| self.table.clone()),
            data_format: overrides.data_format.or(self.data_format),
            ingestion_mapping_reference: overrides
                .ingestion_mapping_reference
                .clone()
                .or_else(|| self.ingestion_mapping_reference.clone()),
            flush_immediately: overrides.flush_immediately.or(self.flush_immediately),
            additional_tags: if overrides.additional_tags.is_empty() {
                self.additional_tags.clone()
            } else {
                overrides.additional_tags.clone()
            },
        }
    }

    /// Check that the required fields are present without consuming `self`.
    pub fn validate(&self) -> Result<(), PropertyError> {
        self.clone().resolve().map(|_| ())
    }

    /// Consume a merged property set and prove the required fields present.
    ///
    /// Database and table must be present and non-blank, and a data format
    /// must be chosen. The mapping-reference requirement for semi-structured
    /// formats is enforced later by the client, not here.
    pub fn resolve(self) -> Result<EffectiveProperties, PropertyError> {
        let database = match self.database {
            Some(d) if !d.trim().is_empty() => d,
            _ => return Err(PropertyError::MissingDatabase),
        };
        let table = match self.table {
            Some(t) if !t.trim().is_empty() => t,
            _ => return Err(PropertyError::MissingTable),
        };
        let data_format = self.data_format.ok_or(PropertyError::MissingFormat)?;
        Ok(EffectiveProperties {
            database,
            table,
            data_format,
            ingestion_mapping_reference: self.ingestion_mapping_reference,
            flush_immediately: self.flush_immediately.unwrap_or(false),
            additional_tags: self.additional_tags,
        })
    }
}

/// A fully resolved, validated property set for one ingestion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveProperties {
    pub database: String,
    pub table: String,
    pub data_format: DataFormat,
    pub ingestion_mapping_reference: Option<String>,
    pub flush_immediately: bool,
    pub additional_tags: Vec<String>,
}
