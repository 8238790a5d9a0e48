//! Reservation Repository

use super::{user, RepoResult};
use crate::db::models::{Reservation, ReservationWithUser};
use crate::utils::time::now_millis;
use sqlx::SqlitePool;

/// Insert a reservation and award points to its owner in one transaction.
///
/// Same contract as `order::create_with_award`: both writes or neither.
/// Date and time are stored verbatim — the conversational layer is
/// deliberately lenient about their format.
pub async fn create_with_award(
    pool: &SqlitePool,
    user_id: i64,
    date: &str,
    time: &str,
    people: i64,
    award: i64,
) -> RepoResult<i64> {
    let now = now_millis();
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "INSERT INTO reservations (user_id, date, time, people, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(user_id)
    .bind(date)
    .bind(time)
    .bind(people)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    let reservation_id = result.last_insert_rowid();

    user::add_points_tx(&mut tx, user_id, award).await?;

    tx.commit().await?;
    Ok(reservation_id)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, Reservation>(
        "SELECT id, user_id, date, time, people, status, created_at \
         FROM reservations WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Most-recent-first reservations joined with their owners, for the admin report.
pub async fn list_recent(pool: &SqlitePool, limit: i64) -> RepoResult<Vec<ReservationWithUser>> {
    let rows = sqlx::query_as::<_, ReservationWithUser>(
        "SELECT r.id, u.tg_id, u.username, r.date, r.time, r.people, r.status, r.created_at \
         FROM reservations r JOIN users u ON u.id = r.user_id \
         ORDER BY r.created_at DESC, r.id DESC LIMIT ?",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
