//! # attestdb-commons
//!
//! Shared building blocks for the AttestDB storage layer: domain entities
//! (Project, Note, Occurrence), typed identifiers, resource-name helpers,
//! and the common error taxonomy.
//!
//! This crate is dependency-light on purpose so that both the storage
//! adapter and any host service can share the same vocabulary without
//! pulling in storage-engine crates.

pub mod errors;
pub mod models;
pub mod names;

pub use errors::{Result, StorageError};
pub use models::{
    FieldMask, Note, NoteKind, Occurrence, Project, SeverityCount, VulnerabilitySummary,
};
pub use models::{NoteId, OccurrenceId, ProjectId};
