mod sqlite_impl;

pub mod db;

use sqlx::SqlitePool;

pub use sqlite_impl::SqliteDatabase;

use crate::traits::StoreError;

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
    sqlx::migrate!("./src/sqlite/migrations")
        .run(pool)
        .await
        .map_err(|e| StoreError::DatabaseError(e.to_string()))?;
    Ok(())
}
