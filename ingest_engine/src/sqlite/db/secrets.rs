use log::debug;
use siw_common::Secret;
use sqlx::SqliteConnection;

use crate::traits::{StoreError, EMPTY_SECRET_KEY};

/// Looks up the Admin API token for the given shop host. A missing row yields the sentinel empty token rather than
/// an error; upstream authentication will fail instead, which callers treat as fatal for the batch.
pub async fn fetch_secret(host: &str, conn: &mut SqliteConnection) -> Result<Secret<String>, StoreError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT shop_secret_key FROM secrets WHERE id = $1").bind(host).fetch_optional(conn).await?;
    let token = match row {
        Some((token,)) => token,
        None => {
            debug!("🔑️ No secret provisioned for {host}");
            EMPTY_SECRET_KEY.to_string()
        },
    };
    Ok(Secret::new(token))
}

pub async fn put_secret(host: &str, token: &str, conn: &mut SqliteConnection) -> Result<(), StoreError> {
    sqlx::query(
        r#"
            INSERT INTO secrets (id, shop_secret_key) VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET shop_secret_key = excluded.shop_secret_key;
        "#,
    )
    .bind(host)
    .bind(token)
    .execute(conn)
    .await?;
    debug!("🔑️ Stored secret for {host}");
    Ok(())
}
