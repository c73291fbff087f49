//! Coupon Repository

use super::{RepoError, RepoResult};
use shared::models::{Coupon, CouponKind};
use sqlx::SqlitePool;
use sqlx::types::Json;

const COUPON_SELECT: &str = "SELECT id, code, kind, discount, usage_limit, starts_at, ends_at, marketer_id, commission_percent, products, created_at, updated_at FROM coupon";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Coupon>> {
    let sql = format!("{COUPON_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Coupon>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_code(pool: &SqlitePool, code: &str) -> RepoResult<Option<Coupon>> {
    let sql = format!("{COUPON_SELECT} WHERE code = ?");
    let row = sqlx::query_as::<_, Coupon>(&sql)
        .bind(code)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list(pool: &SqlitePool, page: u32, per_page: u32) -> RepoResult<(Vec<Coupon>, u64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM coupon")
        .fetch_one(pool)
        .await?;
    let offset = (page.saturating_sub(1) as i64) * per_page as i64;
    let sql = format!("{COUPON_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Coupon>(&sql)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok((rows, total as u64))
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &SqlitePool,
    code: &str,
    kind: CouponKind,
    discount: i64,
    usage_limit: i64,
    starts_at: Option<i64>,
    ends_at: Option<i64>,
    marketer_id: Option<i64>,
    commission_percent: Option<i64>,
    products: &[i64],
) -> RepoResult<Coupon> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO coupon (id, code, kind, discount, usage_limit, starts_at, ends_at, marketer_id, commission_percent, products, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)",
    )
    .bind(id)
    .bind(code)
    .bind(kind)
    .bind(discount)
    .bind(usage_limit)
    .bind(starts_at)
    .bind(ends_at)
    .bind(marketer_id)
    .bind(commission_percent)
    .bind(Json(products))
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create coupon".into()))
}

#[allow(clippy::too_many_arguments)]
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    discount: Option<i64>,
    usage_limit: Option<i64>,
    starts_at: Option<i64>,
    ends_at: Option<i64>,
    products: Option<&[i64]>,
) -> RepoResult<Coupon> {
    let now = shared::util::now_millis();
    let products = products.map(Json);
    let rows = sqlx::query(
        "UPDATE coupon SET discount = COALESCE(?1, discount), usage_limit = COALESCE(?2, usage_limit), starts_at = COALESCE(?3, starts_at), ends_at = COALESCE(?4, ends_at), products = COALESCE(?5, products), updated_at = ?6 WHERE id = ?7",
    )
    .bind(discount)
    .bind(usage_limit)
    .bind(starts_at)
    .bind(ends_at)
    .bind(products)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Coupon {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Coupon {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    sqlx::query("DELETE FROM coupon_usage WHERE coupon_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    let rows = sqlx::query("DELETE FROM coupon WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn usage_for(pool: &SqlitePool, coupon_id: i64, user_id: i64) -> RepoResult<i64> {
    let count: Option<i64> = sqlx::query_scalar(
        "SELECT used_count FROM coupon_usage WHERE coupon_id = ? AND user_id = ?",
    )
    .bind(coupon_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(count.unwrap_or(0))
}

/// Atomically count a use against the per-user limit. The conditional
/// upsert either creates the counter at 1 or increments it while still
/// below the limit; callers treat 0 affected rows as "limit reached".
pub async fn try_increment_usage(
    pool: &SqlitePool,
    coupon_id: i64,
    user_id: i64,
    limit: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "INSERT INTO coupon_usage (coupon_id, user_id, used_count) VALUES (?1, ?2, 1) ON CONFLICT(coupon_id, user_id) DO UPDATE SET used_count = used_count + 1 WHERE used_count < ?3",
    )
    .bind(coupon_id)
    .bind(user_id)
    .bind(limit)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected() > 0)
}
