//! User Repository

use super::RepoResult;
use crate::db::models::User;
use crate::utils::time::now_millis;
use sqlx::sqlite::SqliteConnection;
use sqlx::SqlitePool;

/// Look up a user by Telegram identity, inserting a zero-point row when
/// absent. Returns `(user_id, points)`.
///
/// `INSERT OR IGNORE` against the UNIQUE(tg_id) constraint keeps this
/// idempotent under concurrent calls: at most one row per tg_id, enforced
/// by the database rather than the caller.
pub async fn get_or_create(
    pool: &SqlitePool,
    tg_id: i64,
    username: Option<&str>,
) -> RepoResult<(i64, i64)> {
    let now = now_millis();
    sqlx::query(
        "INSERT OR IGNORE INTO users (tg_id, username, points, created_at) VALUES (?1, ?2, 0, ?3)",
    )
    .bind(tg_id)
    .bind(username)
    .bind(now)
    .execute(pool)
    .await?;

    let row: (i64, i64) = sqlx::query_as("SELECT id, points FROM users WHERE tg_id = ?")
        .bind(tg_id)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Current balance for a Telegram identity. `None` when the user has never
/// contacted the bot — the caller reports 0 without creating a row.
pub async fn find_points(pool: &SqlitePool, tg_id: i64) -> RepoResult<Option<i64>> {
    let row: Option<(i64,)> = sqlx::query_as("SELECT points FROM users WHERE tg_id = ?")
        .bind(tg_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(|r| r.0))
}

pub async fn find_by_tg_id(pool: &SqlitePool, tg_id: i64) -> RepoResult<Option<User>> {
    let row = sqlx::query_as::<_, User>(
        "SELECT id, tg_id, username, points, created_at FROM users WHERE tg_id = ?",
    )
    .bind(tg_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Atomically increment a balance. Delta is always positive — there is no
/// spend path.
pub async fn add_points(pool: &SqlitePool, user_id: i64, delta: i64) -> RepoResult<()> {
    let mut conn = pool.acquire().await?;
    add_points_tx(&mut conn, user_id, delta).await
}

/// Transaction-scoped variant, used by the create-and-award helpers so the
/// point award commits together with the record insert.
pub(crate) async fn add_points_tx(
    conn: &mut SqliteConnection,
    user_id: i64,
    delta: i64,
) -> RepoResult<()> {
    sqlx::query("UPDATE users SET points = points + ?1 WHERE id = ?2")
        .bind(delta)
        .bind(user_id)
        .execute(conn)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::memory_pool;

    #[tokio::test]
    async fn test_get_or_create_inserts_with_zero_points() {
        let pool = memory_pool().await;
        let (id, points) = get_or_create(&pool, 1001, Some("alice")).await.unwrap();
        assert_eq!(points, 0);

        let user = find_by_tg_id(&pool, 1001).await.unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let pool = memory_pool().await;
        let (first, _) = get_or_create(&pool, 1001, Some("alice")).await.unwrap();
        let (second, _) = get_or_create(&pool, 1001, Some("alice")).await.unwrap();
        // Same identity both times, never a second row
        assert_eq!(first, second);

        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE tg_id = 1001")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_get_or_create_preserves_existing_points() {
        let pool = memory_pool().await;
        let (id, _) = get_or_create(&pool, 1001, None).await.unwrap();
        add_points(&pool, id, 15).await.unwrap();

        let (_, points) = get_or_create(&pool, 1001, None).await.unwrap();
        assert_eq!(points, 15);
    }

    #[tokio::test]
    async fn test_get_or_create_without_username() {
        let pool = memory_pool().await;
        get_or_create(&pool, 1002, None).await.unwrap();
        let user = find_by_tg_id(&pool, 1002).await.unwrap().unwrap();
        assert_eq!(user.username, None);
    }

    #[tokio::test]
    async fn test_find_points_unknown_user() {
        let pool = memory_pool().await;
        assert_eq!(find_points(&pool, 404).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_add_points_accumulates() {
        let pool = memory_pool().await;
        let (id, _) = get_or_create(&pool, 1001, None).await.unwrap();
        add_points(&pool, id, 10).await.unwrap();
        add_points(&pool, id, 5).await.unwrap();
        assert_eq!(find_points(&pool, 1001).await.unwrap(), Some(15));
    }
}
