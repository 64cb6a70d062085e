use log::debug;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewWorkItem, WorkItem},
    traits::StoreError,
};

/// Returns up to `limit` pending work items for the given shop, oldest first.
pub async fn fetch_work_items(
    shop_url: &str,
    limit: u32,
    conn: &mut SqliteConnection,
) -> Result<Vec<WorkItem>, StoreError> {
    let items = sqlx::query_as("SELECT * FROM work_items WHERE shop_url = $1 ORDER BY created_at, order_id LIMIT $2")
        .bind(shop_url)
        .bind(limit)
        .fetch_all(conn)
        .await?;
    Ok(items)
}

/// Inserts the work item, returning `false` if a reference with this order id already exists. Pending references
/// are never mutated in place, so an existing row always wins.
pub async fn idempotent_insert(item: NewWorkItem, conn: &mut SqliteConnection) -> Result<bool, StoreError> {
    let result = sqlx::query(
        r#"
            INSERT INTO work_items (order_id, shop_url, payload) VALUES ($1, $2, $3)
            ON CONFLICT (order_id) DO NOTHING;
        "#,
    )
    .bind(item.order_id)
    .bind(&item.shop_url)
    .bind(&item.payload)
    .execute(conn)
    .await?;
    let inserted = result.rows_affected() > 0;
    if inserted {
        debug!("📝️ Work item [{}] enqueued for {}", item.order_id, item.shop_url);
    }
    Ok(inserted)
}

/// Deletes the given order ids in one statement. Ids that are already gone are skipped silently, so concurrent
/// invocations draining the same shop cannot trip each other up.
pub async fn delete_work_items(order_ids: &[i64], conn: &mut SqliteConnection) -> Result<u64, StoreError> {
    if order_ids.is_empty() {
        return Ok(0);
    }
    let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM work_items WHERE order_id IN (");
    let mut ids = query.separated(", ");
    for id in order_ids {
        ids.push_bind(id);
    }
    query.push(")");
    let result = query.build().execute(conn).await.map_err(StoreError::from)?;
    debug!("📝️ Deleted work items: {order_ids:?}");
    Ok(result.rows_affected())
}
