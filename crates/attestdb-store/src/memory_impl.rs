//! Embedded in-memory implementation of [`TableStore`].
//!
//! Backs the adapter in tests and local single-process runs with the same
//! observable semantics a remote wide-column store provides: conditional
//! writes, all-or-nothing transactions, and `(data, partition key, sort
//! key)` ordered index queries with exclusive-start resumption. Interior
//! mutability is a `parking_lot::RwLock` around a `BTreeMap`; a write
//! transaction holds the write lock for its whole check-then-apply cycle,
//! which is what makes it atomic.

use crate::schema::TableSchema;
use crate::table_trait::{
    CancellationReason, Condition, IndexPosition, IndexQuery, Item, ItemKey, QueryPage, Result,
    TableError, TableStore, WriteOp,
};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Transactions larger than this are rejected, matching the small fixed
/// bound remote stores place on transactional writes.
const MAX_TRANSACT_OPS: usize = 25;

/// In-memory table store.
pub struct MemoryTableStore {
    rows: RwLock<BTreeMap<ItemKey, Item>>,
    schema: RwLock<Option<TableSchema>>,
    /// When set, every operation fails with `Unavailable`. Lets tests
    /// exercise the adapter's degraded paths without a real outage.
    unavailable: RwLock<bool>,
}

impl MemoryTableStore {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            schema: RwLock::new(None),
            unavailable: RwLock::new(false),
        }
    }

    /// Toggles simulated backend unavailability.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write() = unavailable;
    }

    /// Number of physical rows currently stored.
    pub fn row_count(&self) -> usize {
        self.rows.read().len()
    }

    fn check_available(&self) -> Result<()> {
        if *self.unavailable.read() {
            return Err(TableError::Unavailable(
                "simulated backend outage".to_string(),
            ));
        }
        Ok(())
    }

    fn condition_holds(rows: &BTreeMap<ItemKey, Item>, key: &ItemKey, condition: Condition) -> bool {
        match condition {
            Condition::None => true,
            Condition::NotExists => !rows.contains_key(key),
            Condition::Exists => rows.contains_key(key),
        }
    }
}

impl Default for MemoryTableStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableStore for MemoryTableStore {
    async fn create_table(&self, schema: &TableSchema) -> Result<()> {
        self.check_available()?;
        let mut current = self.schema.write();
        if current.is_none() {
            *current = Some(schema.clone());
        }
        Ok(())
    }

    async fn get_item(&self, key: &ItemKey, _consistent: bool) -> Result<Option<Item>> {
        self.check_available()?;
        Ok(self.rows.read().get(key).cloned())
    }

    async fn put_item(&self, item: Item, condition: Condition) -> Result<()> {
        self.check_available()?;
        let mut rows = self.rows.write();
        let key = item.key();
        if !Self::condition_holds(&rows, &key, condition) {
            return Err(TableError::ConditionFailed(key.to_string()));
        }
        rows.insert(key, item);
        Ok(())
    }

    async fn delete_item(&self, key: &ItemKey, condition: Condition) -> Result<()> {
        self.check_available()?;
        let mut rows = self.rows.write();
        if !Self::condition_holds(&rows, key, condition) {
            return Err(TableError::ConditionFailed(key.to_string()));
        }
        rows.remove(key);
        Ok(())
    }

    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<()> {
        self.check_available()?;
        if ops.len() > MAX_TRANSACT_OPS {
            return Err(TableError::Io(format!(
                "transaction of {} operations exceeds the limit of {}",
                ops.len(),
                MAX_TRANSACT_OPS
            )));
        }

        let mut rows = self.rows.write();

        // Check every condition before touching anything.
        let reasons: Vec<CancellationReason> = ops
            .iter()
            .map(|op| {
                let (key, condition) = match op {
                    WriteOp::Put { item, condition } => (item.key(), *condition),
                    WriteOp::Delete { key, condition } => (key.clone(), *condition),
                };
                if Self::condition_holds(&rows, &key, condition) {
                    CancellationReason::None
                } else {
                    CancellationReason::ConditionFailed
                }
            })
            .collect();

        if reasons
            .iter()
            .any(|r| *r == CancellationReason::ConditionFailed)
        {
            return Err(TableError::TransactionCanceled { reasons });
        }

        for op in ops {
            match op {
                WriteOp::Put { item, .. } => {
                    rows.insert(item.key(), item);
                }
                WriteOp::Delete { key, .. } => {
                    rows.remove(&key);
                }
            }
        }
        Ok(())
    }

    async fn query_index(&self, query: IndexQuery) -> Result<QueryPage> {
        self.check_available()?;
        let rows = self.rows.read();

        fn order_triple(item: &Item) -> (&str, &str, &str) {
            (&item.data, &item.partition_key, &item.sort_key)
        }

        let mut matches: Vec<&Item> = rows
            .values()
            .filter(|item| item.sort_key == query.hash)
            .filter(|item| match &query.range_eq {
                Some(data) => &item.data == data,
                None => true,
            })
            .collect();
        matches.sort_by(|a, b| order_triple(a).cmp(&order_triple(b)));

        let mut items: Vec<Item> = matches
            .into_iter()
            .filter(|item| match &query.start_after {
                Some(pos) => {
                    order_triple(item)
                        > (
                            pos.data.as_str(),
                            pos.partition_key.as_str(),
                            pos.sort_key.as_str(),
                        )
                }
                None => true,
            })
            .cloned()
            .collect();

        let mut last_key = None;
        if query.limit > 0 && items.len() >= query.limit {
            items.truncate(query.limit);
            last_key = items.last().map(IndexPosition::from);
        }

        Ok(QueryPage { items, last_key })
    }
}
