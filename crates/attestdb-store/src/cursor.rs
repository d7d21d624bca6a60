//! Opaque continuation tokens for paginated listings.
//!
//! A token is the three key attributes of the last returned row joined by
//! a single reserved delimiter: `"{partition_key}{d}{sort_key}{d}{data}"`.
//! Decoding demands exactly three non-empty components; anything else is
//! an invalid token, and the list operation that received it returns an
//! empty page instead of an error.

use crate::table_trait::IndexPosition;

/// Decoded form of a caller-supplied page token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    /// No token: start from the beginning.
    Start,
    /// Resume strictly after this index position.
    Resume(IndexPosition),
}

impl PageToken {
    /// Decodes a caller-supplied token. Returns `None` for any malformed
    /// shape: wrong component count or an empty component.
    pub fn decode(token: &str, delimiter: char) -> Option<PageToken> {
        if token.is_empty() {
            return Some(PageToken::Start);
        }
        let parts: Vec<&str> = token.split(delimiter).collect();
        if parts.len() != 3 || parts.iter().any(|p| p.is_empty()) {
            return None;
        }
        Some(PageToken::Resume(IndexPosition {
            partition_key: parts[0].to_string(),
            sort_key: parts[1].to_string(),
            data: parts[2].to_string(),
        }))
    }

    /// Encodes the last-evaluated position into a token. Returns `None`
    /// when any component is empty; such a position cannot be resumed
    /// from, and the listing ends without a token instead.
    pub fn encode(position: &IndexPosition, delimiter: char) -> Option<String> {
        if position.partition_key.is_empty()
            || position.sort_key.is_empty()
            || position.data.is_empty()
        {
            return None;
        }
        Some(format!(
            "{}{}{}{}{}",
            position.partition_key, delimiter, position.sort_key, delimiter, position.data
        ))
    }
}
