//! # attestdb-store
//!
//! Single-table storage adapter for AttestDB's three record kinds
//! (Project, Note, Occurrence) on top of a wide-column store offering
//! exact-key lookups and ordered range scans over one secondary index.
//!
//! ## Architecture
//!
//! ```text
//! MetadataStorage (adapter.rs)      ← CRUD/list/relationship contract
//!     ↓
//! QueryEngine / TransactionalWriter ← reads, conditional & transactional writes
//!     ↓
//! KeyBuilder / SchemaCodec / PageToken
//!     ↓
//! TableStore (table_trait.rs)       ← backing-store primitives
//!     ↓
//! MemoryTableStore / remote client
//! ```
//!
//! ## Schema
//!
//! One table, composite primary key `(PartitionKey, SortKey)`, one
//! all-projecting secondary index on `(SortKey, Data)`. Projects and
//! notes are one row each; an occurrence is two rows written and deleted
//! transactionally: its primary row and a denormalized note-link row that
//! makes "occurrences of a note" a plain index query.

pub mod adapter;
pub mod codec;
pub mod config;
pub mod cursor;
pub mod keys;
pub mod memory_impl;
pub mod query;
pub mod schema;
pub mod table_trait;
pub mod writer;

pub use adapter::{MetadataStorage, WideColumnStorage};
pub use codec::SchemaCodec;
pub use config::StorageConfig;
pub use cursor::PageToken;
pub use keys::{KeyBuilder, RowKey, SortKeyValue};
pub use memory_impl::MemoryTableStore;
pub use query::{ListPage, QueryEngine};
pub use schema::{IndexSchema, RowKind, SchemaConfig, TableSchema};
pub use table_trait::{
    CancellationReason, Condition, IndexPosition, IndexQuery, Item, ItemKey, QueryPage, TableError,
    TableStore, WriteOp,
};
pub use writer::TransactionalWriter;

// Re-export the shared vocabulary so hosts can depend on one crate.
pub use attestdb_commons::{
    FieldMask, Note, NoteId, NoteKind, Occurrence, OccurrenceId, Project, ProjectId, Result,
    StorageError, VulnerabilitySummary,
};
