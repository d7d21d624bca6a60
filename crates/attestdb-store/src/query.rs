//! Read-side query engine: get-by-id lookups and paginated index listings.
//!
//! A backend failure while scanning is logged and yields an empty page
//! with an empty token rather than an error, and so does a malformed page
//! token. Corrupted stored payloads are the exception: they surface as
//! internal errors, never silently.

use crate::codec::SchemaCodec;
use crate::cursor::PageToken;
use crate::schema::SchemaConfig;
use crate::table_trait::{IndexQuery, ItemKey, TableStore};
use attestdb_commons::{Result, StorageError};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Page size applied when the caller passes a non-positive value.
const DEFAULT_PAGE_SIZE: i32 = 50;
/// Upper bound on a single page.
const MAX_PAGE_SIZE: i32 = 1000;

/// One page of a list operation: decoded entities plus the continuation
/// token for the next page (empty when the listing is exhausted).
#[derive(Debug, Clone)]
pub struct ListPage<T> {
    pub entities: Vec<T>,
    pub next_token: String,
}

impl<T> ListPage<T> {
    fn empty() -> Self {
        Self {
            entities: Vec::new(),
            next_token: String::new(),
        }
    }
}

/// Translates list and relationship queries into index range queries and
/// get-by-id requests into primary-key lookups.
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn TableStore>,
    schema: Arc<SchemaConfig>,
}

impl QueryEngine {
    pub fn new(store: Arc<dyn TableStore>, schema: Arc<SchemaConfig>) -> Self {
        Self { store, schema }
    }

    /// Strongly consistent single-item lookup.
    ///
    /// `descriptor` names the entity for error messages, e.g.
    /// `"projects/p1"`. Returns `NotFound` for a missing row and for a
    /// degenerate row with an empty partition key.
    pub async fn get_entity<T: DeserializeOwned>(
        &self,
        key: &ItemKey,
        descriptor: &str,
    ) -> Result<T> {
        let item = self.store.get_item(key, true).await.map_err(|e| {
            log::error!("Error when seeking {}: {}", descriptor, e);
            StorageError::unavailable(format!("lookup of {} failed: {}", descriptor, e))
        })?;

        match item {
            Some(item) if !item.partition_key.is_empty() => SchemaCodec::decode(&item.json),
            _ => Err(StorageError::not_found(format!(
                "{} does not exist",
                descriptor
            ))),
        }
    }

    /// Paginated index listing.
    ///
    /// `hash` and `range_eq` come from the key builder: a discriminator
    /// plus scope for list-by-type, or a note full name with no range
    /// predicate for the relationship query. The filter expression of the
    /// public contract is not consulted anywhere; pages are unfiltered.
    pub async fn list_entities<T: DeserializeOwned>(
        &self,
        hash: String,
        range_eq: Option<String>,
        page_size: i32,
        page_token: &str,
    ) -> Result<ListPage<T>> {
        let start_after = match PageToken::decode(page_token, self.schema.token_delimiter) {
            Some(PageToken::Start) => None,
            Some(PageToken::Resume(position)) => Some(position),
            None => {
                log::warn!("Error when trying to parse page token");
                return Ok(ListPage::empty());
            }
        };

        let limit = if page_size <= 0 {
            DEFAULT_PAGE_SIZE as usize
        } else {
            page_size.min(MAX_PAGE_SIZE) as usize
        };

        let page = match self
            .store
            .query_index(IndexQuery {
                hash,
                range_eq,
                start_after,
                limit,
            })
            .await
        {
            Ok(page) => page,
            Err(e) => {
                log::error!("Error when listing entities: {}", e);
                return Ok(ListPage::empty());
            }
        };

        let mut entities = Vec::with_capacity(page.items.len());
        for item in &page.items {
            entities.push(SchemaCodec::decode(&item.json)?);
        }

        let next_token = match page.last_key {
            Some(position) => {
                match PageToken::encode(&position, self.schema.token_delimiter) {
                    Some(token) => token,
                    None => {
                        log::error!("Unable to encode last evaluated key into a page token");
                        String::new()
                    }
                }
            }
            None => String::new(),
        };

        Ok(ListPage {
            entities,
            next_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_impl::MemoryTableStore;
    use crate::table_trait::{Condition, Item};
    use attestdb_commons::Project;

    fn engine(store: Arc<MemoryTableStore>) -> QueryEngine {
        QueryEngine::new(store, Arc::new(SchemaConfig::default()))
    }

    fn project_item(id: &str) -> Item {
        let name = format!("projects/{}", id);
        Item {
            partition_key: name.clone(),
            sort_key: "PROJECT".to_string(),
            data: name.clone(),
            json: serde_json::to_string(&Project::new(name)).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_get_entity_not_found() {
        let store = Arc::new(MemoryTableStore::new());
        let err = engine(store)
            .get_entity::<Project>(&ItemKey::new("projects/p1", "PROJECT"), "projects/p1")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_get_entity_transport_failure_is_unavailable() {
        let store = Arc::new(MemoryTableStore::new());
        store.set_unavailable(true);
        let err = engine(store)
            .get_entity::<Project>(&ItemKey::new("projects/p1", "PROJECT"), "projects/p1")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_malformed_token_yields_empty_page() {
        let store = Arc::new(MemoryTableStore::new());
        store
            .put_item(project_item("p1"), Condition::None)
            .await
            .unwrap();
        let page = engine(store)
            .list_entities::<Project>("PROJECT".to_string(), None, 10, "only&two")
            .await
            .unwrap();
        assert!(page.entities.is_empty());
        assert!(page.next_token.is_empty());
    }

    #[tokio::test]
    async fn test_backend_failure_yields_empty_page() {
        let store = Arc::new(MemoryTableStore::new());
        store.set_unavailable(true);
        let page = engine(store)
            .list_entities::<Project>("PROJECT".to_string(), None, 10, "")
            .await
            .unwrap();
        assert!(page.entities.is_empty());
        assert!(page.next_token.is_empty());
    }

    #[tokio::test]
    async fn test_corrupted_row_surfaces_internal_error() {
        let store = Arc::new(MemoryTableStore::new());
        let mut item = project_item("p1");
        item.json = "{broken".to_string();
        store.put_item(item, Condition::None).await.unwrap();
        let err = engine(store)
            .list_entities::<Project>("PROJECT".to_string(), None, 10, "")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Internal(_)));
    }

    #[tokio::test]
    async fn test_non_positive_page_size_uses_default() {
        let store = Arc::new(MemoryTableStore::new());
        for id in ["a", "b", "c"] {
            store
                .put_item(project_item(id), Condition::None)
                .await
                .unwrap();
        }
        let page = engine(store)
            .list_entities::<Project>("PROJECT".to_string(), None, 0, "")
            .await
            .unwrap();
        assert_eq!(page.entities.len(), 3);
        assert!(page.next_token.is_empty());
    }
}
