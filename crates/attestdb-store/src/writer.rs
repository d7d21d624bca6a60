//! Write side: conditional single-row puts and the two-row transactional
//! discipline that keeps an occurrence's primary row and its denormalized
//! note-link row consistent.
//!
//! Server-assigned fields are stamped here: full resource names, creation
//! and update timestamps, and the generated occurrence id. Updates are
//! full-payload replacements; the field mask accepted by the public
//! contract is deliberately not applied (see the update methods).

use crate::codec::SchemaCodec;
use crate::keys::KeyBuilder;
use crate::schema::{RowKind, SchemaConfig};
use crate::table_trait::{Condition, TableError, TableStore, WriteOp};
use attestdb_commons::names;
use attestdb_commons::{
    FieldMask, Note, NoteId, Occurrence, OccurrenceId, Project, ProjectId, Result, StorageError,
};
use chrono::Utc;
use std::sync::Arc;

/// Performs all mutating operations against the backing store.
#[derive(Clone)]
pub struct TransactionalWriter {
    store: Arc<dyn TableStore>,
    schema: Arc<SchemaConfig>,
    keys: KeyBuilder,
}

impl TransactionalWriter {
    pub fn new(store: Arc<dyn TableStore>, schema: Arc<SchemaConfig>) -> Self {
        let keys = KeyBuilder::new(schema.clone());
        Self {
            store,
            schema,
            keys,
        }
    }

    /// Creates a project under a uniqueness condition.
    pub async fn create_project(&self, project_id: &ProjectId, project: &Project) -> Result<Project> {
        let name = names::format_project(project_id);
        let mut stored = project.clone();
        stored.name = name.clone();
        stored.created_at = Some(Utc::now());

        let json = SchemaCodec::encode(&stored)?;
        let item = self.keys.project_row(&name).into_item(&self.schema, json);
        self.store
            .put_item(item, Condition::NotExists)
            .await
            .map_err(|e| self.map_create_error(e, &name))?;
        Ok(stored)
    }

    /// Creates a note under a uniqueness condition.
    pub async fn create_note(
        &self,
        project_id: &ProjectId,
        note_id: &NoteId,
        note: &Note,
    ) -> Result<Note> {
        let name = names::format_note(project_id, note_id);
        let mut stored = note.clone();
        stored.name = name.clone();
        stored.created_at = Some(Utc::now());

        let json = SchemaCodec::encode(&stored)?;
        let item = self
            .keys
            .note_row(&name, project_id)
            .into_item(&self.schema, json);
        self.store
            .put_item(item, Condition::NotExists)
            .await
            .map_err(|e| self.map_create_error(e, &name))?;
        Ok(stored)
    }

    /// Overwrites a note, requiring prior existence.
    ///
    /// The field mask is accepted but not applied: this is a full-payload
    /// replacement. A condition failure surfaces as `AlreadyExists`, the
    /// same signal used for create races; callers distinguish by intent.
    pub async fn update_note(
        &self,
        project_id: &ProjectId,
        note_id: &NoteId,
        note: &Note,
        _mask: Option<&FieldMask>,
    ) -> Result<Note> {
        let name = names::format_note(project_id, note_id);
        let mut stored = note.clone();
        stored.name = name.clone();
        stored.updated_at = Some(Utc::now());

        let json = SchemaCodec::encode(&stored)?;
        let item = self
            .keys
            .note_row(&name, project_id)
            .into_item(&self.schema, json);
        self.store
            .put_item(item, Condition::Exists)
            .await
            .map_err(|e| self.map_create_error(e, &name))?;
        Ok(stored)
    }

    /// Deletes a project, requiring prior existence. A condition failure
    /// is translated to `NotFound`.
    pub async fn delete_project(&self, project_id: &ProjectId) -> Result<()> {
        let name = names::format_project(project_id);
        let key = self
            .keys
            .primary_key(&name, RowKind::Project);
        self.store
            .delete_item(&key, Condition::Exists)
            .await
            .map_err(|e| self.map_delete_error(e, &name))
    }

    /// Deletes a note, requiring prior existence. A condition failure is
    /// translated to `NotFound`.
    pub async fn delete_note(&self, project_id: &ProjectId, note_id: &NoteId) -> Result<()> {
        let name = names::format_note(project_id, note_id);
        let key = self.keys.primary_key(&name, RowKind::Note);
        self.store
            .delete_item(&key, Condition::Exists)
            .await
            .map_err(|e| self.map_delete_error(e, &name))
    }

    /// Creates an occurrence: generates its id, stamps the creation time,
    /// and writes both rows in one transaction: the primary row
    /// conditioned on non-existence, the note-link row unconditionally.
    pub async fn create_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence: &Occurrence,
    ) -> Result<Occurrence> {
        let occurrence_id = OccurrenceId::generate();
        let name = names::format_occurrence(project_id, &occurrence_id);
        let mut stored = occurrence.clone();
        stored.name = name.clone();
        stored.created_at = Some(Utc::now());

        let json = SchemaCodec::encode(&stored)?;
        let primary = self
            .keys
            .occurrence_row(&name, project_id)
            .into_item(&self.schema, json.clone());
        let link = self
            .keys
            .occurrence_link_row(&name, &stored.note_name)
            .into_item(&self.schema, json);

        self.store
            .transact_write(vec![
                WriteOp::Put {
                    item: primary,
                    condition: Condition::NotExists,
                },
                WriteOp::Put {
                    item: link,
                    condition: Condition::None,
                },
            ])
            .await
            .map_err(|e| self.map_create_error(e, &name))?;
        Ok(stored)
    }

    /// Overwrites an occurrence, requiring the primary row to exist, and
    /// rewrites the note-link row in the same transaction. The field mask
    /// is accepted but not applied, as on [`Self::update_note`].
    pub async fn update_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
        occurrence: &Occurrence,
        _mask: Option<&FieldMask>,
    ) -> Result<Occurrence> {
        let name = names::format_occurrence(project_id, occurrence_id);
        let mut stored = occurrence.clone();
        stored.name = name.clone();
        stored.updated_at = Some(Utc::now());

        let json = SchemaCodec::encode(&stored)?;
        let primary = self
            .keys
            .occurrence_row(&name, project_id)
            .into_item(&self.schema, json.clone());
        let link = self
            .keys
            .occurrence_link_row(&name, &stored.note_name)
            .into_item(&self.schema, json);

        self.store
            .transact_write(vec![
                WriteOp::Put {
                    item: primary,
                    condition: Condition::Exists,
                },
                WriteOp::Put {
                    item: link,
                    condition: Condition::None,
                },
            ])
            .await
            .map_err(|e| self.map_create_error(e, &name))?;
        Ok(stored)
    }

    /// Deletes both rows of an occurrence in one transaction: the primary
    /// row conditioned on existence, the note-link row unconditionally.
    ///
    /// `note_name` comes from the read the caller performed beforehand.
    /// If the occurrence vanished between that read and this delete, the
    /// transaction cancels and surfaces as a raw `Internal` failure, not
    /// `NotFound`.
    pub async fn delete_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
        note_name: &str,
    ) -> Result<()> {
        let name = names::format_occurrence(project_id, occurrence_id);
        let primary = self
            .keys
            .primary_key(&name, RowKind::Occurrence);
        let link = self
            .keys
            .occurrence_link_row(&name, note_name)
            .item_key(&self.schema);

        self.store
            .transact_write(vec![
                WriteOp::Delete {
                    key: primary,
                    condition: Condition::Exists,
                },
                WriteOp::Delete {
                    key: link,
                    condition: Condition::None,
                },
            ])
            .await
            .map_err(|e| self.map_backend_error(e, &name))
    }

    /// Creates notes one at a time. Per-item failures are logged and the
    /// entity skipped; the returned error collection is always empty.
    pub async fn batch_create_notes(
        &self,
        project_id: &ProjectId,
        notes: &[(NoteId, Note)],
    ) -> (Vec<Note>, Vec<StorageError>) {
        let errors = Vec::new();
        let mut created = Vec::new();
        for (note_id, note) in notes {
            match self.create_note(project_id, note_id, note).await {
                Ok(stored) => created.push(stored),
                Err(e) => {
                    // Note already exists (or failed otherwise), skipping.
                    log::debug!("Skipping note {} in batch create: {}", note_id, e);
                }
            }
        }
        (created, errors)
    }

    /// Creates occurrences one at a time, with the same skip-and-continue
    /// behavior as [`Self::batch_create_notes`].
    pub async fn batch_create_occurrences(
        &self,
        project_id: &ProjectId,
        occurrences: &[Occurrence],
    ) -> (Vec<Occurrence>, Vec<StorageError>) {
        let errors = Vec::new();
        let mut created = Vec::new();
        for occurrence in occurrences {
            match self.create_occurrence(project_id, occurrence).await {
                Ok(stored) => created.push(stored),
                Err(e) => {
                    log::debug!("Skipping occurrence in batch create: {}", e);
                }
            }
        }
        (created, errors)
    }

    /// Maps a write failure on create/update paths: condition failures
    /// become `AlreadyExists`, everything else is a backend failure.
    fn map_create_error(&self, error: TableError, name: &str) -> StorageError {
        if error.is_condition_failure() {
            return StorageError::already_exists(format!("{} already exists", name));
        }
        self.map_backend_error(error, name)
    }

    /// Maps a delete condition failure to `NotFound`.
    fn map_delete_error(&self, error: TableError, name: &str) -> StorageError {
        if error.is_condition_failure() {
            return StorageError::not_found(format!("{} does not exist", name));
        }
        self.map_backend_error(error, name)
    }

    fn map_backend_error(&self, error: TableError, name: &str) -> StorageError {
        match error {
            TableError::Unavailable(msg) => StorageError::unavailable(msg),
            other => {
                log::error!("Write for {} failed: {}", name, other);
                StorageError::internal(format!("write for {} failed: {}", name, other))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_impl::MemoryTableStore;
    use crate::table_trait::ItemKey;

    fn writer(store: Arc<MemoryTableStore>) -> TransactionalWriter {
        TransactionalWriter::new(store, Arc::new(SchemaConfig::default()))
    }

    #[tokio::test]
    async fn test_create_project_stamps_server_fields() {
        let store = Arc::new(MemoryTableStore::new());
        let stored = writer(store)
            .create_project(&ProjectId::new("p1"), &Project::default())
            .await
            .unwrap();
        assert_eq!(stored.name, "projects/p1");
        assert!(stored.created_at.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_project_is_already_exists() {
        let store = Arc::new(MemoryTableStore::new());
        let w = writer(store);
        let p = ProjectId::new("p1");
        w.create_project(&p, &Project::default()).await.unwrap();
        let err = w.create_project(&p, &Project::default()).await.unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_create_occurrence_writes_both_rows() {
        let store = Arc::new(MemoryTableStore::new());
        let w = writer(store.clone());
        let occurrence = Occurrence {
            note_name: "projects/p1/notes/n1".to_string(),
            ..Default::default()
        };
        let stored = w
            .create_occurrence(&ProjectId::new("p1"), &occurrence)
            .await
            .unwrap();
        assert!(stored.name.starts_with("projects/p1/occurrences/"));
        assert_eq!(store.row_count(), 2);

        let link = store
            .get_item(
                &ItemKey::new(stored.name.clone(), "projects/p1/notes/n1"),
                true,
            )
            .await
            .unwrap()
            .expect("note-link row must exist");
        assert_eq!(link.data, stored.name);
    }

    #[tokio::test]
    async fn test_update_note_requires_existence() {
        let store = Arc::new(MemoryTableStore::new());
        let w = writer(store);
        let err = w
            .update_note(
                &ProjectId::new("p1"),
                &NoteId::new("n1"),
                &Note::default(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_note_is_not_found() {
        let store = Arc::new(MemoryTableStore::new());
        let err = writer(store)
            .delete_note(&ProjectId::new("p1"), &NoteId::new("n1"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_occurrence_race_is_raw_failure() {
        let store = Arc::new(MemoryTableStore::new());
        let err = writer(store)
            .delete_occurrence(
                &ProjectId::new("p1"),
                &OccurrenceId::new("gone"),
                "projects/p1/notes/n1",
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Internal(_)));
    }

    #[tokio::test]
    async fn test_batch_create_notes_skips_duplicates_silently() {
        let store = Arc::new(MemoryTableStore::new());
        let w = writer(store);
        let p = ProjectId::new("p1");
        w.create_note(&p, &NoteId::new("n1"), &Note::default())
            .await
            .unwrap();

        let batch = vec![
            (NoteId::new("n1"), Note::default()),
            (NoteId::new("n2"), Note::default()),
        ];
        let (created, errors) = w.batch_create_notes(&p, &batch).await;
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name, "projects/p1/notes/n2");
        assert!(errors.is_empty());
    }
}
