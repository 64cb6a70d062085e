use log::debug;
use sqlx::SqliteConnection;

use crate::traits::StoreError;

pub async fn mark_processing(shop_url: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO processing_markers (shop_url) VALUES ($1) ON CONFLICT (shop_url) DO NOTHING")
        .bind(shop_url)
        .execute(conn)
        .await?;
    Ok(())
}

/// Removes the shop's processing marker. Idempotent; clearing an absent marker is a no-op.
pub async fn clear_marker(shop_url: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM processing_markers WHERE shop_url = $1").bind(shop_url).execute(conn).await?;
    debug!("🛑️ Cleared processing marker: {shop_url}");
    Ok(())
}

pub async fn is_processing(shop_url: &str, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT shop_url FROM processing_markers WHERE shop_url = $1")
        .bind(shop_url)
        .fetch_optional(conn)
        .await?;
    Ok(row.is_some())
}
