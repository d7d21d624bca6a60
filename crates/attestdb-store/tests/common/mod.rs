//! Shared helpers for storage integration tests.

use attestdb_store::{MemoryTableStore, Note, Occurrence, SchemaConfig, WideColumnStorage};
use std::sync::Arc;

/// Adapter over a fresh in-memory table store.
pub fn storage() -> WideColumnStorage {
    storage_with_store().0
}

/// Adapter plus a handle to its backing store for row-level assertions.
pub fn storage_with_store() -> (WideColumnStorage, Arc<MemoryTableStore>) {
    let store = Arc::new(MemoryTableStore::new());
    let adapter = WideColumnStorage::new(store.clone(), SchemaConfig::for_table("test_metadata"))
        .expect("default schema is valid");
    (adapter, store)
}

#[allow(dead_code)]
pub fn sample_note(short_description: &str) -> Note {
    Note {
        short_description: short_description.to_string(),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn sample_occurrence(note_name: &str, resource_uri: &str) -> Occurrence {
    Occurrence {
        note_name: note_name.to_string(),
        resource_uri: resource_uri.to_string(),
        ..Default::default()
    }
}
