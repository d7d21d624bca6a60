//! The three persisted record kinds: Project, Note, Occurrence.
//!
//! Entities carry their full resource name (`projects/p1/notes/n1`) plus a
//! payload. Server-assigned fields (`name` on create, timestamps, the
//! generated occurrence id) are stamped by the storage layer; everything
//! else round-trips exactly through serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of analysis a note describes and an occurrence attests to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteKind {
    #[default]
    NoteKindUnspecified,
    Vulnerability,
    Build,
    Image,
    Package,
    Deployment,
    Discovery,
    Attestation,
}

/// Root namespace entity. Notes and occurrences live inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Project {
    /// Full resource name, e.g. `projects/p1`. Server-assigned on create.
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: None,
        }
    }
}

/// A unit of analysis metadata, referenced by occurrences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Note {
    /// Full resource name, e.g. `projects/p1/notes/n1`. Server-assigned.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub kind: NoteKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// An instance of a note found on a resource. References exactly one note
/// by its full name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Occurrence {
    /// Full resource name, e.g. `projects/p1/occurrences/<uuid>`.
    /// Server-assigned; the id component is generated at creation.
    #[serde(default)]
    pub name: String,
    /// URI of the resource this occurrence applies to.
    #[serde(default)]
    pub resource_uri: String,
    /// Full resource name of the referenced note.
    #[serde(default)]
    pub note_name: String,
    #[serde(default)]
    pub kind: NoteKind,
    #[serde(default)]
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Per-severity counts of vulnerability occurrences in a project.
///
/// The storage layer does not compute this; the query is a permanent stub
/// that returns the empty summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct VulnerabilitySummary {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub counts: Vec<SeverityCount>,
}

/// One severity bucket in a [`VulnerabilitySummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeverityCount {
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub total_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_json_round_trip() {
        let note = Note {
            name: "projects/p1/notes/n1".to_string(),
            short_description: "CVE-2024-0001".to_string(),
            long_description: "A very long description".to_string(),
            kind: NoteKind::Vulnerability,
            related_urls: vec!["https://example.com/advisory".to_string()],
            created_at: Some(Utc::now()),
            updated_at: None,
        };
        let json = serde_json::to_string(&note).unwrap();
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_occurrence_defaults_tolerate_missing_fields() {
        let occ: Occurrence = serde_json::from_str(r#"{"note_name":"projects/p1/notes/n1"}"#).unwrap();
        assert_eq!(occ.note_name, "projects/p1/notes/n1");
        assert_eq!(occ.kind, NoteKind::NoteKindUnspecified);
        assert!(occ.created_at.is_none());
    }
}
