//! Key construction for the single-table layout.
//!
//! One physical key scheme serves three query patterns:
//!
//! - get-by-id: partition key = entity full name, sort key = discriminator
//! - list-by-type: index hash = discriminator, index range = scope id
//!   (the full project name for projects, the owning project id for notes
//!   and occurrences)
//! - occurrences-by-note: index hash = the note's full name, index range =
//!   the occurrence's own full name (which is what orders the result)
//!
//! Sort keys are modeled as a tagged enum rather than raw strings so a
//! discriminator row and a note-link row can never be confused, and are
//! rendered to strings only at the item boundary. Key construction is
//! pure: full names are used verbatim, nothing validates their structure
//! here.

use crate::schema::{RowKind, SchemaConfig};
use crate::table_trait::{Item, ItemKey};
use attestdb_commons::ProjectId;
use std::sync::Arc;

/// Sort key of a physical row: either a type discriminator or the full
/// name of the note an occurrence links to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortKeyValue {
    Kind(RowKind),
    NoteLink(String),
}

impl SortKeyValue {
    /// Renders the sort key to its stored string form.
    pub fn render(&self, schema: &SchemaConfig) -> String {
        match self {
            SortKeyValue::Kind(kind) => schema.discriminator(*kind).to_string(),
            SortKeyValue::NoteLink(note_name) => note_name.clone(),
        }
    }
}

/// Fully determined key tuple of one row, before payload attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowKey {
    pub partition_key: String,
    pub sort_key: SortKeyValue,
    pub data: String,
}

impl RowKey {
    /// Attaches a serialized payload, producing the physical item.
    pub fn into_item(self, schema: &SchemaConfig, json: String) -> Item {
        Item {
            sort_key: self.sort_key.render(schema),
            partition_key: self.partition_key,
            data: self.data,
            json,
        }
    }

    /// The row's composite primary key.
    pub fn item_key(&self, schema: &SchemaConfig) -> ItemKey {
        ItemKey::new(self.partition_key.clone(), self.sort_key.render(schema))
    }
}

/// Deterministic, infallible key construction for every row and query the
/// schema supports.
#[derive(Clone)]
pub struct KeyBuilder {
    schema: Arc<SchemaConfig>,
}

impl KeyBuilder {
    pub fn new(schema: Arc<SchemaConfig>) -> Self {
        Self { schema }
    }

    /// Primary row of a project. The index range attribute carries the
    /// full name so the all-projects listing sorts by name.
    pub fn project_row(&self, project_name: &str) -> RowKey {
        RowKey {
            partition_key: project_name.to_string(),
            sort_key: SortKeyValue::Kind(RowKind::Project),
            data: project_name.to_string(),
        }
    }

    /// Primary row of a note, scoped to its project in the index.
    pub fn note_row(&self, note_name: &str, project_id: &ProjectId) -> RowKey {
        RowKey {
            partition_key: note_name.to_string(),
            sort_key: SortKeyValue::Kind(RowKind::Note),
            data: project_id.as_str().to_string(),
        }
    }

    /// Primary row of an occurrence, scoped to its project in the index.
    pub fn occurrence_row(&self, occurrence_name: &str, project_id: &ProjectId) -> RowKey {
        RowKey {
            partition_key: occurrence_name.to_string(),
            sort_key: SortKeyValue::Kind(RowKind::Occurrence),
            data: project_id.as_str().to_string(),
        }
    }

    /// Denormalized note-link row of an occurrence. The occurrence's own
    /// full name goes into the index range attribute so occurrences of a
    /// note come back sorted by name.
    pub fn occurrence_link_row(&self, occurrence_name: &str, note_name: &str) -> RowKey {
        RowKey {
            partition_key: occurrence_name.to_string(),
            sort_key: SortKeyValue::NoteLink(note_name.to_string()),
            data: occurrence_name.to_string(),
        }
    }

    /// Primary key for a get-by-id lookup.
    pub fn primary_key(&self, full_name: &str, kind: RowKind) -> ItemKey {
        ItemKey::new(full_name, self.schema.discriminator(kind))
    }

    /// Index hash and range predicate for a list-by-type query.
    /// `scope` is `None` for projects (scan all of the type).
    pub fn list_by_kind(&self, kind: RowKind, scope: Option<&ProjectId>) -> (String, Option<String>) {
        (
            self.schema.discriminator(kind).to_string(),
            scope.map(|p| p.as_str().to_string()),
        )
    }

    /// Index hash for the occurrences-of-a-note relationship query.
    pub fn note_occurrences_hash(&self, note_name: &str) -> String {
        note_name.to_string()
    }
}
