use siw_common::Secret;
use thiserror::Error;

use crate::db_types::{NewWorkItem, WorkItem};

/// The sentinel token returned when a shop has no provisioned secret. The caller proceeds and fails upstream
/// authentication instead, which is treated as a fatal batch error.
pub const EMPTY_SECRET_KEY: &str = "EmptyKey";

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::DatabaseError(e.to_string())
    }
}

/// Durable keyed storage of pending order references, partitioned by shop.
///
/// Multiple invocations for the same shop may run concurrently, so implementations must tolerate concurrent readers
/// and deleters on the same shop partition. Deletes are idempotent; deleting an already-absent id is not an error.
#[allow(async_fn_in_trait)]
pub trait WorkItemStore {
    /// Returns up to `limit` pending work items for the given shop. Order is unspecified.
    async fn fetch_work_items(&self, shop_url: &str, limit: u32) -> Result<Vec<WorkItem>, StoreError>;

    /// Enqueues a pending reference. Idempotent on `order_id`; returns `false` if the item already existed.
    async fn insert_work_item(&self, item: NewWorkItem) -> Result<bool, StoreError>;

    /// Removes the given ids in one batch. Returns the number of rows actually deleted, which may be less than
    /// `order_ids.len()` if a concurrent invocation got there first.
    async fn delete_work_items(&self, order_ids: &[i64]) -> Result<u64, StoreError>;
}

/// The per-shop "recursive processing in progress" flag.
///
/// The marker is created by whoever starts a processing sequence for a shop; it is cleared exclusively by the
/// controller once no work remains. Clearing an absent marker is a no-op.
#[allow(async_fn_in_trait)]
pub trait MarkerStore {
    async fn mark_processing(&self, shop_url: &str) -> Result<(), StoreError>;

    async fn clear_marker(&self, shop_url: &str) -> Result<(), StoreError>;

    async fn is_processing(&self, shop_url: &str) -> Result<bool, StoreError>;
}

/// Per-shop API credential lookup, keyed by the hostname portion of the shop URL.
#[allow(async_fn_in_trait)]
pub trait SecretStore {
    /// Returns the access token for the given host, or [`EMPTY_SECRET_KEY`] when none is provisioned. A missing
    /// secret is not an error at this layer.
    async fn fetch_secret(&self, host: &str) -> Result<Secret<String>, StoreError>;

    async fn put_secret(&self, host: &str, token: &str) -> Result<(), StoreError>;
}
