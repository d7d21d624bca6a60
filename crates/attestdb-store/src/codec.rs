//! Entity ⇄ payload codec for the `Json` attribute.
//!
//! Serialization failure on a well-formed domain object is an internal
//! error, not a panic. Deserialization failure means the stored row is
//! corrupt; it is reported as a recoverable internal error so one bad row
//! cannot take the whole service down.

use attestdb_commons::{Result, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Stateless codec over `serde_json`.
pub struct SchemaCodec;

impl SchemaCodec {
    /// Serializes an entity to the stored payload string.
    pub fn encode<T: Serialize>(entity: &T) -> Result<String> {
        serde_json::to_string(entity).map_err(|e| {
            log::error!("Failed to serialize entity payload: {}", e);
            StorageError::internal(format!("failed to serialize entity: {}", e))
        })
    }

    /// Deserializes a stored payload string back into an entity.
    pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
        serde_json::from_str(json).map_err(|e| {
            log::error!("Failed to deserialize stored payload: {}", e);
            StorageError::internal(format!("corrupted stored payload: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attestdb_commons::{Note, NoteKind};

    #[test]
    fn test_round_trip_is_exact() {
        let note = Note {
            name: "projects/p1/notes/n1".to_string(),
            short_description: "short".to_string(),
            kind: NoteKind::Attestation,
            ..Default::default()
        };
        let json = SchemaCodec::encode(&note).unwrap();
        let back: Note = SchemaCodec::decode(&json).unwrap();
        assert_eq!(back, note);
    }

    #[test]
    fn test_corrupted_payload_is_recoverable_internal_error() {
        let err = SchemaCodec::decode::<Note>("{not json").unwrap_err();
        assert!(matches!(err, StorageError::Internal(_)));
    }
}
