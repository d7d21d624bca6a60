//! Resource-name formatting and parsing.
//!
//! Full names follow the host service's conventions:
//!
//! - project:    `projects/{project_id}`
//! - note:       `projects/{project_id}/notes/{note_id}`
//! - occurrence: `projects/{project_id}/occurrences/{occurrence_id}`
//!
//! The storage layer treats full names as opaque key material; parsing is
//! only needed to resolve an occurrence's note reference back into ids.

use crate::errors::{Result, StorageError};
use crate::models::{NoteId, OccurrenceId, ProjectId};

const PROJECTS_SEGMENT: &str = "projects";
const NOTES_SEGMENT: &str = "notes";
const OCCURRENCES_SEGMENT: &str = "occurrences";

/// Formats a project full name: `projects/{project_id}`.
pub fn format_project(project_id: &ProjectId) -> String {
    format!("{}/{}", PROJECTS_SEGMENT, project_id)
}

/// Formats a note full name: `projects/{project_id}/notes/{note_id}`.
pub fn format_note(project_id: &ProjectId, note_id: &NoteId) -> String {
    format!(
        "{}/{}/{}/{}",
        PROJECTS_SEGMENT, project_id, NOTES_SEGMENT, note_id
    )
}

/// Formats an occurrence full name:
/// `projects/{project_id}/occurrences/{occurrence_id}`.
pub fn format_occurrence(project_id: &ProjectId, occurrence_id: &OccurrenceId) -> String {
    format!(
        "{}/{}/{}/{}",
        PROJECTS_SEGMENT, project_id, OCCURRENCES_SEGMENT, occurrence_id
    )
}

/// Parses a note full name back into `(project_id, note_id)`.
pub fn parse_note(name: &str) -> Result<(ProjectId, NoteId)> {
    parse_child(name, NOTES_SEGMENT)
        .map(|(p, n)| (p, NoteId::new(n)))
        .ok_or_else(|| StorageError::invalid_input(format!("invalid note name: {:?}", name)))
}

/// Parses an occurrence full name back into `(project_id, occurrence_id)`.
pub fn parse_occurrence(name: &str) -> Result<(ProjectId, OccurrenceId)> {
    parse_child(name, OCCURRENCES_SEGMENT)
        .map(|(p, o)| (p, OccurrenceId::new(o)))
        .ok_or_else(|| {
            StorageError::invalid_input(format!("invalid occurrence name: {:?}", name))
        })
}

fn parse_child(name: &str, segment: &str) -> Option<(ProjectId, String)> {
    let mut parts = name.split('/');
    let (a, p, b, id) = (parts.next()?, parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || a != PROJECTS_SEGMENT || b != segment {
        return None;
    }
    if p.is_empty() || id.is_empty() {
        return None;
    }
    Some((ProjectId::new(p), id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        let p = ProjectId::new("p1");
        assert_eq!(format_project(&p), "projects/p1");
        assert_eq!(format_note(&p, &NoteId::new("n1")), "projects/p1/notes/n1");
        assert_eq!(
            format_occurrence(&p, &OccurrenceId::new("o1")),
            "projects/p1/occurrences/o1"
        );
    }

    #[test]
    fn test_parse_note_round_trip() {
        let name = format_note(&ProjectId::new("p1"), &NoteId::new("n1"));
        let (p, n) = parse_note(&name).unwrap();
        assert_eq!(p.as_str(), "p1");
        assert_eq!(n.as_str(), "n1");
    }

    #[test]
    fn test_parse_note_rejects_malformed() {
        assert!(parse_note("projects/p1").is_err());
        assert!(parse_note("projects/p1/occurrences/o1").is_err());
        assert!(parse_note("projects//notes/n1").is_err());
        assert!(parse_note("projects/p1/notes/n1/extra").is_err());
        assert!(parse_note("").is_err());
    }

    #[test]
    fn test_parse_occurrence() {
        let (p, o) = parse_occurrence("projects/p1/occurrences/abc").unwrap();
        assert_eq!(p.as_str(), "p1");
        assert_eq!(o.as_str(), "abc");
        assert!(parse_occurrence("projects/p1/notes/n1").is_err());
    }
}
