//! Domain models for the metadata/attestation tracking service.

pub mod entities;
pub mod field_mask;
pub mod ids;

pub use entities::{Note, NoteKind, Occurrence, Project, SeverityCount, VulnerabilitySummary};
pub use field_mask::FieldMask;
pub use ids::{NoteId, OccurrenceId, ProjectId};
