//! The storage adapter: composes the key builder, codec, query engine,
//! and transactional writer into the CRUD/list/relationship contract the
//! host service consumes.
//!
//! The adapter is a stateless façade. It holds only a handle to the
//! backing store and the schema configuration, so it is safe for
//! unbounded concurrent callers without internal locking. Consistency is
//! entirely the backing store's: conditional writes arbitrate races,
//! transactions bound atomicity, and list scans are weakly isolated.
//! Nothing is cached and nothing is retried.

use crate::query::{ListPage, QueryEngine};
use crate::schema::{RowKind, SchemaConfig};
use crate::table_trait::TableStore;
use crate::writer::TransactionalWriter;
use crate::KeyBuilder;
use async_trait::async_trait;
use attestdb_commons::names;
use attestdb_commons::{
    FieldMask, Note, NoteId, Occurrence, OccurrenceId, Project, ProjectId, Result, StorageError,
    VulnerabilitySummary,
};
use std::sync::Arc;

/// Storage capability consumed by the host service.
///
/// All list operations accept a filter expression for contract
/// compatibility but ignore it entirely: pages are unfiltered. This is a
/// deliberate limitation, not an oversight to fix silently.
#[async_trait]
pub trait MetadataStorage: Send + Sync {
    async fn create_project(&self, project_id: &ProjectId, project: Project) -> Result<Project>;
    async fn get_project(&self, project_id: &ProjectId) -> Result<Project>;
    async fn list_projects(
        &self,
        filter: &str,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<Project>>;
    async fn delete_project(&self, project_id: &ProjectId) -> Result<()>;

    async fn create_note(
        &self,
        project_id: &ProjectId,
        note_id: &NoteId,
        note: Note,
    ) -> Result<Note>;
    async fn get_note(&self, project_id: &ProjectId, note_id: &NoteId) -> Result<Note>;
    async fn list_notes(
        &self,
        project_id: &ProjectId,
        filter: &str,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<Note>>;
    async fn update_note(
        &self,
        project_id: &ProjectId,
        note_id: &NoteId,
        note: Note,
        mask: Option<FieldMask>,
    ) -> Result<Note>;
    async fn delete_note(&self, project_id: &ProjectId, note_id: &NoteId) -> Result<()>;
    /// Sequential creates; failed entries are skipped and the error
    /// collection is always empty (see `TransactionalWriter`).
    async fn batch_create_notes(
        &self,
        project_id: &ProjectId,
        notes: Vec<(NoteId, Note)>,
    ) -> (Vec<Note>, Vec<StorageError>);

    async fn create_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence: Occurrence,
    ) -> Result<Occurrence>;
    async fn get_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
    ) -> Result<Occurrence>;
    async fn list_occurrences(
        &self,
        project_id: &ProjectId,
        filter: &str,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<Occurrence>>;
    async fn update_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
        occurrence: Occurrence,
        mask: Option<FieldMask>,
    ) -> Result<Occurrence>;
    async fn delete_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
    ) -> Result<()>;
    async fn batch_create_occurrences(
        &self,
        project_id: &ProjectId,
        occurrences: Vec<Occurrence>,
    ) -> (Vec<Occurrence>, Vec<StorageError>);

    /// Resolves the note an occurrence links to.
    async fn get_occurrence_note(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
    ) -> Result<Note>;
    /// Lists occurrences referencing a note, across all projects.
    async fn list_note_occurrences(
        &self,
        project_id: &ProjectId,
        note_id: &NoteId,
        filter: &str,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<Occurrence>>;
    /// Permanently a stub: returns the empty summary, never an error.
    async fn get_vulnerability_summary(
        &self,
        project_id: &ProjectId,
        filter: &str,
    ) -> Result<VulnerabilitySummary>;
}

/// [`MetadataStorage`] implementation over a wide-column table store.
pub struct WideColumnStorage {
    schema: Arc<SchemaConfig>,
    store: Arc<dyn TableStore>,
    keys: KeyBuilder,
    query: QueryEngine,
    writer: TransactionalWriter,
}

impl WideColumnStorage {
    /// Builds the adapter. Fails if the schema configuration is invalid
    /// (empty names, colliding discriminators).
    pub fn new(store: Arc<dyn TableStore>, schema: SchemaConfig) -> Result<Self> {
        schema.validate()?;
        let schema = Arc::new(schema);
        Ok(Self {
            keys: KeyBuilder::new(schema.clone()),
            query: QueryEngine::new(store.clone(), schema.clone()),
            writer: TransactionalWriter::new(store.clone(), schema.clone()),
            store,
            schema,
        })
    }

    /// Provisions the physical table shape. Idempotent.
    pub async fn ensure_table(&self) -> Result<()> {
        self.store
            .create_table(&self.schema.table_schema())
            .await
            .map_err(|e| StorageError::unavailable(format!("table provisioning failed: {}", e)))
    }

    /// The schema configuration in effect.
    pub fn schema(&self) -> &SchemaConfig {
        &self.schema
    }
}

#[async_trait]
impl MetadataStorage for WideColumnStorage {
    async fn create_project(&self, project_id: &ProjectId, project: Project) -> Result<Project> {
        self.writer.create_project(project_id, &project).await
    }

    async fn get_project(&self, project_id: &ProjectId) -> Result<Project> {
        let name = names::format_project(project_id);
        let key = self.keys.primary_key(&name, RowKind::Project);
        self.query.get_entity(&key, &name).await
    }

    async fn list_projects(
        &self,
        _filter: &str,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<Project>> {
        let (hash, range_eq) = self.keys.list_by_kind(RowKind::Project, None);
        self.query
            .list_entities(hash, range_eq, page_size, page_token)
            .await
    }

    async fn delete_project(&self, project_id: &ProjectId) -> Result<()> {
        self.writer.delete_project(project_id).await
    }

    async fn create_note(
        &self,
        project_id: &ProjectId,
        note_id: &NoteId,
        note: Note,
    ) -> Result<Note> {
        self.writer.create_note(project_id, note_id, &note).await
    }

    async fn get_note(&self, project_id: &ProjectId, note_id: &NoteId) -> Result<Note> {
        let name = names::format_note(project_id, note_id);
        let key = self.keys.primary_key(&name, RowKind::Note);
        self.query.get_entity(&key, &name).await
    }

    async fn list_notes(
        &self,
        project_id: &ProjectId,
        _filter: &str,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<Note>> {
        let (hash, range_eq) = self.keys.list_by_kind(RowKind::Note, Some(project_id));
        self.query
            .list_entities(hash, range_eq, page_size, page_token)
            .await
    }

    async fn update_note(
        &self,
        project_id: &ProjectId,
        note_id: &NoteId,
        note: Note,
        mask: Option<FieldMask>,
    ) -> Result<Note> {
        self.writer
            .update_note(project_id, note_id, &note, mask.as_ref())
            .await
    }

    async fn delete_note(&self, project_id: &ProjectId, note_id: &NoteId) -> Result<()> {
        self.writer.delete_note(project_id, note_id).await
    }

    async fn batch_create_notes(
        &self,
        project_id: &ProjectId,
        notes: Vec<(NoteId, Note)>,
    ) -> (Vec<Note>, Vec<StorageError>) {
        self.writer.batch_create_notes(project_id, &notes).await
    }

    async fn create_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence: Occurrence,
    ) -> Result<Occurrence> {
        self.writer.create_occurrence(project_id, &occurrence).await
    }

    async fn get_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
    ) -> Result<Occurrence> {
        let name = names::format_occurrence(project_id, occurrence_id);
        let key = self.keys.primary_key(&name, RowKind::Occurrence);
        self.query.get_entity(&key, &name).await
    }

    async fn list_occurrences(
        &self,
        project_id: &ProjectId,
        _filter: &str,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<Occurrence>> {
        let (hash, range_eq) = self
            .keys
            .list_by_kind(RowKind::Occurrence, Some(project_id));
        self.query
            .list_entities(hash, range_eq, page_size, page_token)
            .await
    }

    async fn update_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
        occurrence: Occurrence,
        mask: Option<FieldMask>,
    ) -> Result<Occurrence> {
        self.writer
            .update_occurrence(project_id, occurrence_id, &occurrence, mask.as_ref())
            .await
    }

    async fn delete_occurrence(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
    ) -> Result<()> {
        // Both rows must go, and the note-link row's key is only known
        // from the stored occurrence, so read first. A NotFound here
        // aborts before any write.
        let occurrence = self.get_occurrence(project_id, occurrence_id).await?;
        self.writer
            .delete_occurrence(project_id, occurrence_id, &occurrence.note_name)
            .await
    }

    async fn batch_create_occurrences(
        &self,
        project_id: &ProjectId,
        occurrences: Vec<Occurrence>,
    ) -> (Vec<Occurrence>, Vec<StorageError>) {
        self.writer
            .batch_create_occurrences(project_id, &occurrences)
            .await
    }

    async fn get_occurrence_note(
        &self,
        project_id: &ProjectId,
        occurrence_id: &OccurrenceId,
    ) -> Result<Note> {
        let occurrence = self.get_occurrence(project_id, occurrence_id).await?;
        let (note_project, note_id) = names::parse_note(&occurrence.note_name)?;
        self.get_note(&note_project, &note_id).await
    }

    async fn list_note_occurrences(
        &self,
        project_id: &ProjectId,
        note_id: &NoteId,
        _filter: &str,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<Occurrence>> {
        let note_name = names::format_note(project_id, note_id);
        let hash = self.keys.note_occurrences_hash(&note_name);
        self.query
            .list_entities(hash, None, page_size, page_token)
            .await
    }

    async fn get_vulnerability_summary(
        &self,
        _project_id: &ProjectId,
        _filter: &str,
    ) -> Result<VulnerabilitySummary> {
        Ok(VulnerabilitySummary::default())
    }
}
