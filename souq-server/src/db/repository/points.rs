//! Loyalty Points Repository

use super::{RepoError, RepoResult};
use shared::models::{PointsConfig, PointsMode, StaticPointRequest};
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn get_config(pool: &SqlitePool) -> RepoResult<PointsConfig> {
    let row = sqlx::query_as::<_, PointsConfig>(
        "SELECT id, points_per_unit, points_per_currency_unit, min_points, max_points, mode FROM points_config WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;
    row.ok_or_else(|| RepoError::NotFound("Points config not initialized".into()))
}

pub async fn update_config(
    pool: &SqlitePool,
    points_per_unit: Option<i64>,
    points_per_currency_unit: Option<i64>,
    min_points: Option<i64>,
    max_points: Option<i64>,
    mode: Option<PointsMode>,
) -> RepoResult<PointsConfig> {
    sqlx::query(
        "UPDATE points_config SET points_per_unit = COALESCE(?1, points_per_unit), points_per_currency_unit = COALESCE(?2, points_per_currency_unit), min_points = COALESCE(?3, min_points), max_points = COALESCE(?4, max_points), mode = COALESCE(?5, mode) WHERE id = 1",
    )
    .bind(points_per_unit)
    .bind(points_per_currency_unit)
    .bind(min_points)
    .bind(max_points)
    .bind(mode)
    .execute(pool)
    .await?;
    get_config(pool).await
}

pub async fn insert_static_request<'e, E: SqliteExecutor<'e>>(
    ex: E,
    user_id: i64,
    points: i64,
    amount: i64,
) -> RepoResult<StaticPointRequest> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO static_point_request (id, user_id, points, amount, status, created_at) VALUES (?1, ?2, ?3, ?4, 'initiated', ?5)",
    )
    .bind(id)
    .bind(user_id)
    .bind(points)
    .bind(amount)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(StaticPointRequest {
        id,
        user_id,
        points,
        amount,
        status: "initiated".into(),
        created_at: now,
    })
}

/// One open request per user at a time
pub async fn has_pending_request(pool: &SqlitePool, user_id: i64) -> RepoResult<bool> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM static_point_request WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn find_static_request(
    pool: &SqlitePool,
    id: i64,
) -> RepoResult<Option<StaticPointRequest>> {
    let row = sqlx::query_as::<_, StaticPointRequest>(
        "SELECT id, user_id, points, amount, status, created_at FROM static_point_request WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn list_static_requests(
    pool: &SqlitePool,
    page: u32,
    per_page: u32,
) -> RepoResult<(Vec<StaticPointRequest>, u64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM static_point_request")
        .fetch_one(pool)
        .await?;
    let offset = (page.saturating_sub(1) as i64) * per_page as i64;
    let rows = sqlx::query_as::<_, StaticPointRequest>(
        "SELECT id, user_id, points, amount, status, created_at FROM static_point_request ORDER BY created_at DESC LIMIT ? OFFSET ?",
    )
    .bind(per_page as i64)
    .bind(offset)
    .fetch_all(pool)
    .await?;
    Ok((rows, total as u64))
}

/// Close a reviewed request out of the queue
pub async fn delete_static_request<'e, E: SqliteExecutor<'e>>(ex: E, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM static_point_request WHERE id = ?")
        .bind(id)
        .execute(ex)
        .await?;
    Ok(rows.rows_affected() > 0)
}
