//! Backing-store abstraction for pluggable table implementations.
//!
//! The adapter only needs a narrow contract from its wide-column store:
//! exact-key item lookup, conditional single-item writes, small
//! all-or-nothing write transactions, and ordered range queries over one
//! secondary index. Implementations map these onto their native
//! primitives; [`crate::MemoryTableStore`] provides an embedded
//! implementation with the same semantics for tests and local runs.
//!
//! All methods are async: real implementations talk to a remote store and
//! every call may block on network I/O. Callers own cancellation (wrap
//! calls in `tokio::time::timeout`); implementations must ensure an
//! aborted call never leaves a transaction half-applied.

use crate::schema::TableSchema;
use async_trait::async_trait;
use thiserror::Error;

/// Result type for table-store operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors surfaced by a table-store implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A conditional write's precondition did not hold.
    #[error("Condition failed for item {0}")]
    ConditionFailed(String),

    /// A write transaction was canceled; one reason per operation, in
    /// submission order.
    #[error("Transaction canceled: {reasons:?}")]
    TransactionCanceled { reasons: Vec<CancellationReason> },

    /// The physical table does not exist.
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Connectivity or throttling; the operation may succeed if retried.
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("I/O error: {0}")]
    Io(String),
}

/// Per-operation outcome inside a canceled transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    /// The operation itself was fine; a sibling canceled the transaction.
    None,
    /// This operation's condition did not hold.
    ConditionFailed,
    /// The operation conflicted with a concurrent transaction.
    TransactionConflict,
}

impl TableError {
    /// True when the error means a write precondition did not hold,
    /// either on a single item or inside a transaction.
    pub fn is_condition_failure(&self) -> bool {
        match self {
            TableError::ConditionFailed(_) => true,
            TableError::TransactionCanceled { reasons } => reasons
                .iter()
                .any(|r| *r == CancellationReason::ConditionFailed),
            _ => false,
        }
    }
}

/// One physical row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub partition_key: String,
    pub sort_key: String,
    pub data: String,
    pub json: String,
}

impl Item {
    /// The row's composite primary key.
    pub fn key(&self) -> ItemKey {
        ItemKey {
            partition_key: self.partition_key.clone(),
            sort_key: self.sort_key.clone(),
        }
    }
}

/// Composite primary key of a row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    pub partition_key: String,
    pub sort_key: String,
}

impl ItemKey {
    pub fn new(partition_key: impl Into<String>, sort_key: impl Into<String>) -> Self {
        Self {
            partition_key: partition_key.into(),
            sort_key: sort_key.into(),
        }
    }
}

impl std::fmt::Display for ItemKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.partition_key, self.sort_key)
    }
}

/// Precondition on the row's current state for a conditional write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Unconditional.
    None,
    /// Both key attributes must be absent (create-uniqueness).
    NotExists,
    /// Both key attributes must be present (update/delete-existence).
    Exists,
}

/// One operation inside a write transaction.
#[derive(Debug, Clone)]
pub enum WriteOp {
    Put { item: Item, condition: Condition },
    Delete { key: ItemKey, condition: Condition },
}

/// Position of a row in the secondary index, used for exclusive-start
/// resumption and as the last-evaluated key of a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPosition {
    pub partition_key: String,
    pub sort_key: String,
    pub data: String,
}

impl IndexPosition {
    fn order_key(&self) -> (&str, &str, &str) {
        (&self.data, &self.partition_key, &self.sort_key)
    }

    /// Index ordering: `(data, partition key, sort key)` byte-wise
    /// ascending within one hash value.
    pub fn cmp_order(&self, other: &IndexPosition) -> std::cmp::Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl From<&Item> for IndexPosition {
    fn from(item: &Item) -> Self {
        Self {
            partition_key: item.partition_key.clone(),
            sort_key: item.sort_key.clone(),
            data: item.data.clone(),
        }
    }
}

/// A range query against the secondary index.
#[derive(Debug, Clone)]
pub struct IndexQuery {
    /// Value of the index hash attribute (the row's sort key).
    pub hash: String,
    /// Optional equality predicate on the index range attribute.
    pub range_eq: Option<String>,
    /// Resume strictly after this position.
    pub start_after: Option<IndexPosition>,
    /// Maximum number of items to return.
    pub limit: usize,
}

/// One page of index-query results.
#[derive(Debug, Clone, Default)]
pub struct QueryPage {
    /// Matching items in `(data, partition key, sort key)` ascending order.
    pub items: Vec<Item>,
    /// Position of the last returned item when the page filled up;
    /// `None` when the scan is exhausted.
    pub last_key: Option<IndexPosition>,
}

/// Contract the storage adapter requires from its backing store.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Provisions the table shape. Idempotent: an existing table with the
    /// same name is left untouched.
    async fn create_table(&self, schema: &TableSchema) -> Result<()>;

    /// Looks up one row by its composite primary key. `consistent`
    /// requests the strongest single-item read the store offers.
    async fn get_item(&self, key: &ItemKey, consistent: bool) -> Result<Option<Item>>;

    /// Writes one row, subject to `condition`.
    async fn put_item(&self, item: Item, condition: Condition) -> Result<()>;

    /// Deletes one row, subject to `condition`.
    async fn delete_item(&self, key: &ItemKey, condition: Condition) -> Result<()>;

    /// Applies all operations atomically, or none of them. Condition
    /// failures cancel the whole transaction and report per-operation
    /// reasons.
    async fn transact_write(&self, ops: Vec<WriteOp>) -> Result<()>;

    /// Runs an ordered range query against the secondary index.
    async fn query_index(&self, query: IndexQuery) -> Result<QueryPage>;
}
