//! Occurrence scenarios: two-row lifecycle, the note relationship, and
//! the vulnerability-summary stub.

mod common;

use attestdb_store::{
    MetadataStorage, Occurrence, OccurrenceId, ProjectId, StorageError, VulnerabilitySummary,
};
use attestdb_commons::{names, NoteId};

#[tokio::test]
async fn test_create_occurrence_generates_name_and_resolves_note() {
    let storage = common::storage();
    let p = ProjectId::new("p1");
    let note = storage
        .create_note(&p, &NoteId::new("n1"), common::sample_note("advisory"))
        .await
        .unwrap();
    assert_eq!(note.name, "projects/p1/notes/n1");

    let created = storage
        .create_occurrence(&p, common::sample_occurrence(&note.name, "img://a"))
        .await
        .unwrap();
    assert!(created.name.starts_with("projects/p1/occurrences/"));
    assert!(created.created_at.is_some());

    let (_, occurrence_id) = names::parse_occurrence(&created.name).unwrap();
    let fetched = storage.get_occurrence(&p, &occurrence_id).await.unwrap();
    assert_eq!(fetched, created);

    let resolved = storage
        .get_occurrence_note(&p, &occurrence_id)
        .await
        .unwrap();
    assert_eq!(resolved, note);
}

#[tokio::test]
async fn test_occurrence_occupies_two_rows() {
    let (storage, store) = common::storage_with_store();
    let p = ProjectId::new("p1");
    storage
        .create_occurrence(&p, common::sample_occurrence("projects/p1/notes/n1", "r"))
        .await
        .unwrap();
    assert_eq!(store.row_count(), 2);
}

#[tokio::test]
async fn test_delete_occurrence_removes_both_rows() {
    let (storage, store) = common::storage_with_store();
    let p = ProjectId::new("p1");
    storage
        .create_note(&p, &NoteId::new("n1"), common::sample_note("advisory"))
        .await
        .unwrap();
    let occurrence = storage
        .create_occurrence(
            &p,
            common::sample_occurrence("projects/p1/notes/n1", "img://a"),
        )
        .await
        .unwrap();
    let (_, occurrence_id) = names::parse_occurrence(&occurrence.name).unwrap();

    let rows_before = store.row_count();
    storage.delete_occurrence(&p, &occurrence_id).await.unwrap();
    assert_eq!(store.row_count(), rows_before - 2);

    let err = storage.get_occurrence(&p, &occurrence_id).await.unwrap_err();
    assert!(err.is_not_found());

    let linked = storage
        .list_note_occurrences(&p, &NoteId::new("n1"), "", 10, "")
        .await
        .unwrap();
    assert!(linked.entities.is_empty());
}

#[tokio::test]
async fn test_delete_missing_occurrence_is_not_found() {
    let storage = common::storage();
    let err = storage
        .delete_occurrence(&ProjectId::new("p1"), &OccurrenceId::new("gone"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_occurrence_rewrites_link_row() {
    let storage = common::storage();
    let p = ProjectId::new("p1");
    let occurrence = storage
        .create_occurrence(
            &p,
            common::sample_occurrence("projects/p1/notes/n1", "img://a"),
        )
        .await
        .unwrap();
    let (_, occurrence_id) = names::parse_occurrence(&occurrence.name).unwrap();

    let mut replacement = occurrence.clone();
    replacement.remediation = "upgrade to 2.0".to_string();
    let updated = storage
        .update_occurrence(&p, &occurrence_id, replacement, None)
        .await
        .unwrap();
    assert!(updated.updated_at.is_some());

    let fetched = storage.get_occurrence(&p, &occurrence_id).await.unwrap();
    assert_eq!(fetched.remediation, "upgrade to 2.0");
}

#[tokio::test]
async fn test_update_missing_occurrence_fails() {
    let storage = common::storage();
    let err = storage
        .update_occurrence(
            &ProjectId::new("p1"),
            &OccurrenceId::new("gone"),
            Occurrence::default(),
            None,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StorageError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_list_note_occurrences_spans_projects() {
    let storage = common::storage();
    let p1 = ProjectId::new("p1");
    let p2 = ProjectId::new("p2");
    let note = storage
        .create_note(&p1, &NoteId::new("n1"), common::sample_note("advisory"))
        .await
        .unwrap();

    storage
        .create_occurrence(&p1, common::sample_occurrence(&note.name, "img://a"))
        .await
        .unwrap();
    storage
        .create_occurrence(&p2, common::sample_occurrence(&note.name, "img://b"))
        .await
        .unwrap();

    let page = storage
        .list_note_occurrences(&p1, &NoteId::new("n1"), "", 10, "")
        .await
        .unwrap();
    assert_eq!(page.entities.len(), 2);
    assert!(page
        .entities
        .iter()
        .all(|o| o.note_name == "projects/p1/notes/n1"));
}

#[tokio::test]
async fn test_list_occurrences_scoped_to_project() {
    let storage = common::storage();
    let p1 = ProjectId::new("p1");
    let p2 = ProjectId::new("p2");
    storage
        .create_occurrence(&p1, common::sample_occurrence("projects/p1/notes/n1", "a"))
        .await
        .unwrap();
    storage
        .create_occurrence(&p2, common::sample_occurrence("projects/p1/notes/n1", "b"))
        .await
        .unwrap();

    let page = storage.list_occurrences(&p1, "", 10, "").await.unwrap();
    assert_eq!(page.entities.len(), 1);
    assert!(page.entities[0].name.starts_with("projects/p1/occurrences/"));
}

#[tokio::test]
async fn test_batch_create_occurrences_reports_no_errors() {
    let storage = common::storage();
    let p = ProjectId::new("p1");
    let batch = vec![
        common::sample_occurrence("projects/p1/notes/n1", "img://a"),
        common::sample_occurrence("projects/p1/notes/n1", "img://b"),
    ];
    let (created, errors) = storage.batch_create_occurrences(&p, batch).await;
    assert_eq!(created.len(), 2);
    assert!(errors.is_empty());
    // Generated ids keep the two apart.
    assert_ne!(created[0].name, created[1].name);
}

#[tokio::test]
async fn test_vulnerability_summary_is_a_stub() {
    let storage = common::storage();
    let summary = storage
        .get_vulnerability_summary(&ProjectId::new("p1"), "kind=\"VULNERABILITY\"")
        .await
        .unwrap();
    assert_eq!(summary, VulnerabilitySummary::default());
}
