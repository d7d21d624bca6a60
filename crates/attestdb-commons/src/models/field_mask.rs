//! Field mask accepted by update operations.
//!
//! The public contract accepts a mask of field paths to update. The
//! storage layer accepts it but performs full-payload replacement; see the
//! update operations in `attestdb-store` for the documented limitation.

use serde::{Deserialize, Serialize};

/// A set of field paths, e.g. `["short_description", "kind"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FieldMask {
    #[serde(default)]
    pub paths: Vec<String>,
}

impl FieldMask {
    pub fn new(paths: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}
