//! Physical schema configuration for the single-table layout.
//!
//! Every entity lives in one table with a composite primary key
//! (`PartitionKey`, `SortKey`) and one secondary index on
//! (`SortKey`, `Data`) projecting all attributes. The index is overloaded:
//! the hash attribute alternates between a small closed set of type
//! discriminators (list-by-type queries) and full note names
//! (occurrence-by-note queries). Discriminators therefore must never
//! collide with note names; `SchemaConfig::validate` enforces the naming
//! rule that keeps the two families apart.
//!
//! Field names and discriminator tokens are carried in an explicit
//! configuration value passed at construction rather than process-wide
//! constants, so tests and alternative deployments can rename them.

use attestdb_commons::{Result, StorageError};
use serde::{Deserialize, Serialize};

/// Row discriminator for primary rows of each entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Project,
    Note,
    Occurrence,
}

/// Names and tokens of the physical table layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Physical table name.
    pub table_name: String,
    /// Name of the secondary index on (sort key, data).
    pub index_name: String,
    /// Attribute name of the partition key.
    pub partition_key_attr: String,
    /// Attribute name of the sort key.
    pub sort_key_attr: String,
    /// Attribute name of the index range attribute.
    pub data_attr: String,
    /// Attribute name of the serialized payload.
    pub json_attr: String,
    /// Discriminator token for project primary rows.
    pub project_discriminator: String,
    /// Discriminator token for note primary rows.
    pub note_discriminator: String,
    /// Discriminator token for occurrence primary rows.
    pub occurrence_discriminator: String,
    /// Delimiter joining the three components of a page token.
    pub token_delimiter: char,
}

impl SchemaConfig {
    /// Default layout for the given table name.
    pub fn for_table(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            index_name: "GSI_1".to_string(),
            partition_key_attr: "PartitionKey".to_string(),
            sort_key_attr: "SortKey".to_string(),
            data_attr: "Data".to_string(),
            json_attr: "Json".to_string(),
            project_discriminator: "PROJECT".to_string(),
            note_discriminator: "NOTE".to_string(),
            occurrence_discriminator: "OCCURRENCE".to_string(),
            token_delimiter: '&',
        }
    }

    /// Returns the discriminator token for a row kind.
    pub fn discriminator(&self, kind: RowKind) -> &str {
        match kind {
            RowKind::Project => &self.project_discriminator,
            RowKind::Note => &self.note_discriminator,
            RowKind::Occurrence => &self.occurrence_discriminator,
        }
    }

    /// Validates the layout.
    ///
    /// Discriminators share the index hash attribute with full note names
    /// (`projects/{p}/notes/{n}`), which always contain a `/`. Keeping `/`
    /// out of discriminator tokens is what guarantees the two key families
    /// never collide.
    pub fn validate(&self) -> Result<()> {
        if self.table_name.is_empty() {
            return Err(StorageError::invalid_input("table name cannot be empty"));
        }
        if self.index_name.is_empty() {
            return Err(StorageError::invalid_input("index name cannot be empty"));
        }
        let discriminators = [
            &self.project_discriminator,
            &self.note_discriminator,
            &self.occurrence_discriminator,
        ];
        for d in &discriminators {
            if d.is_empty() {
                return Err(StorageError::invalid_input("discriminator cannot be empty"));
            }
            if d.contains('/') {
                return Err(StorageError::invalid_input(format!(
                    "discriminator {:?} must not contain '/': it would collide with resource names",
                    d
                )));
            }
        }
        if discriminators[0] == discriminators[1]
            || discriminators[0] == discriminators[2]
            || discriminators[1] == discriminators[2]
        {
            return Err(StorageError::invalid_input(
                "discriminators must be pairwise distinct",
            ));
        }
        if self.token_delimiter == '/' {
            return Err(StorageError::invalid_input(
                "token delimiter must not appear in key material",
            ));
        }
        Ok(())
    }

    /// Describes the table shape for provisioning.
    pub fn table_schema(&self) -> TableSchema {
        TableSchema {
            table_name: self.table_name.clone(),
            partition_key_attr: self.partition_key_attr.clone(),
            sort_key_attr: self.sort_key_attr.clone(),
            index: IndexSchema {
                index_name: self.index_name.clone(),
                hash_attr: self.sort_key_attr.clone(),
                range_attr: self.data_attr.clone(),
            },
            on_demand: true,
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self::for_table("attestdb")
    }
}

/// Table shape consumed by [`crate::TableStore::create_table`]: composite
/// primary key plus one all-projecting secondary index, on-demand capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub table_name: String,
    pub partition_key_attr: String,
    pub sort_key_attr: String,
    pub index: IndexSchema,
    /// On-demand (pay-per-request) capacity rather than fixed provisioning.
    pub on_demand: bool,
}

/// Secondary index shape: hash on the sort-key attribute, range on the
/// data attribute, projecting all attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSchema {
    pub index_name: String,
    pub hash_attr: String,
    pub range_attr: String,
}
