//! Type-safe wrappers for entity identifiers.
//!
//! These are the short caller-facing identifiers (the `p1` in
//! `projects/p1`), not full resource names. Wrapping them prevents a
//! project id from being passed where a note id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from a string.
            #[inline]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes the wrapper and returns the inner String.
            #[inline]
            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id! {
    /// Identifier of a project, the root namespace for notes and occurrences.
    ProjectId
}

string_id! {
    /// Identifier of a note within a project.
    NoteId
}

string_id! {
    /// Identifier of an occurrence within a project.
    ///
    /// Occurrence ids are server-generated; callers never supply one.
    OccurrenceId
}

impl OccurrenceId {
    /// Generates a new random occurrence id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_round_trip() {
        let id = ProjectId::new("p1");
        assert_eq!(id.as_str(), "p1");
        assert_eq!(id.to_string(), "p1");
        assert_eq!(ProjectId::from("p1"), id);
    }

    #[test]
    fn test_generated_occurrence_ids_are_unique() {
        let a = OccurrenceId::generate();
        let b = OccurrenceId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }
}
