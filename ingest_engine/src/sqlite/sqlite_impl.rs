//! `SqliteDatabase` is the concrete durable-storage backend of the ingest engine.
//!
//! It wraps a connection pool and implements the storage traits by delegating to the low-level functions in
//! [`super::db`].
use std::fmt::Debug;

use siw_common::Secret;
use sqlx::SqlitePool;

use super::db::{markers, new_pool, secrets, work_items};
use crate::{
    db_types::{NewWorkItem, WorkItem},
    traits::{MarkerStore, SecretStore, StoreError, WorkItemStore},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl WorkItemStore for SqliteDatabase {
    async fn fetch_work_items(&self, shop_url: &str, limit: u32) -> Result<Vec<WorkItem>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        work_items::fetch_work_items(shop_url, limit, &mut conn).await
    }

    async fn insert_work_item(&self, item: NewWorkItem) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        work_items::idempotent_insert(item, &mut conn).await
    }

    async fn delete_work_items(&self, order_ids: &[i64]) -> Result<u64, StoreError> {
        let mut conn = self.pool.acquire().await?;
        work_items::delete_work_items(order_ids, &mut conn).await
    }
}

impl MarkerStore for SqliteDatabase {
    async fn mark_processing(&self, shop_url: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        markers::mark_processing(shop_url, &mut conn).await
    }

    async fn clear_marker(&self, shop_url: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        markers::clear_marker(shop_url, &mut conn).await
    }

    async fn is_processing(&self, shop_url: &str) -> Result<bool, StoreError> {
        let mut conn = self.pool.acquire().await?;
        markers::is_processing(shop_url, &mut conn).await
    }
}

impl SecretStore for SqliteDatabase {
    async fn fetch_secret(&self, host: &str) -> Result<Secret<String>, StoreError> {
        let mut conn = self.pool.acquire().await?;
        secrets::fetch_secret(host, &mut conn).await
    }

    async fn put_secret(&self, host: &str, token: &str) -> Result<(), StoreError> {
        let mut conn = self.pool.acquire().await?;
        secrets::put_secret(host, token, &mut conn).await
    }
}
