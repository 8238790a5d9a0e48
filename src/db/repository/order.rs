//! Order Repository

use super::{user, RepoResult};
use crate::db::models::{Order, OrderWithUser};
use crate::utils::time::now_millis;
use sqlx::SqlitePool;

/// Insert an order and award points to its owner in one transaction.
///
/// Either both writes commit or neither does — a crash between the record
/// insert and the point award cannot silently lose the award. Returns the
/// fresh order id (AUTOINCREMENT, strictly increasing per call).
#[allow(clippy::too_many_arguments)]
pub async fn create_with_award(
    pool: &SqlitePool,
    user_id: i64,
    item: &str,
    quantity: i64,
    total: i64,
    latitude: Option<f64>,
    longitude: Option<f64>,
    award: i64,
) -> RepoResult<i64> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO orders (user_id, item, quantity, total, created_at, latitude, longitude) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(user_id)
    .bind(item)
    .bind(quantity)
    .bind(total)
    .bind(now)
    .bind(latitude)
    .bind(longitude)
    .execute(&mut *tx)
    .await?;
    let order_id = result.last_insert_rowid();

    user::add_points_tx(&mut tx, user_id, award).await?;

    tx.commit().await?;
    Ok(order_id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, Order>(
        "SELECT id, user_id, item, quantity, total, status, created_at, latitude, longitude \
         FROM orders WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Most-recent-first orders joined with their owners, for the admin report.
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<OrderWithUser>> {
    let rows = sqlx::query_as::<_, OrderWithUser>(
        "SELECT o.id, u.tg_id, u.username, o.item, o.quantity, o.total, o.status, o.created_at \
         FROM orders o JOIN users u ON u.id = o.user_id \
         ORDER BY o.created_at DESC, o.id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
