//! User Repository

use super::RepoResult;
use shared::models::{User, UserAddress};
use sqlx::{SqliteExecutor, SqlitePool};

const USER_SELECT: &str = "SELECT id, name, email, phone, role, points, revenue, total_commission, marketer_coupon_id, is_active, created_at, updated_at FROM user";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ? AND is_active = 1");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Atomically deduct points; fails the guard when the balance is short.
pub async fn try_deduct_points<'e, E: SqliteExecutor<'e>>(
    ex: E,
    user_id: i64,
    points: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user SET points = points - ?1, updated_at = ?2 WHERE id = ?3 AND points >= ?1",
    )
    .bind(points)
    .bind(now)
    .bind(user_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected() > 0)
}

/// Credit revenue and earned points after a settled order
pub async fn credit_settlement<'e, E: SqliteExecutor<'e>>(
    ex: E,
    user_id: i64,
    revenue: i64,
    points_earned: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE user SET revenue = revenue + ?1, points = points + ?2, updated_at = ?3 WHERE id = ?4",
    )
    .bind(revenue)
    .bind(points_earned)
    .bind(now)
    .bind(user_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Credit a marketer's floored commission payout
pub async fn add_commission<'e, E: SqliteExecutor<'e>>(
    ex: E,
    marketer_id: i64,
    amount: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE user SET total_commission = total_commission + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(amount)
    .bind(now)
    .bind(marketer_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Append a commission history row at settlement
pub async fn insert_commission_record<'e, E: SqliteExecutor<'e>>(
    ex: E,
    marketer_id: i64,
    order_id: i64,
    commission: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO marketer_commission (id, marketer_id, order_id, commission, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(marketer_id)
    .bind(order_id)
    .bind(commission)
    .bind(now)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn list_addresses(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<UserAddress>> {
    let rows = sqlx::query_as::<_, UserAddress>(
        "SELECT id, user_id, city, area, address, postal_code, created_at FROM user_address WHERE user_id = ? ORDER BY created_at ASC, id ASC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Append an address to the user's book if it is new, evicting the oldest
/// entries beyond the 5-slot cap.
pub async fn save_address(
    pool: &SqlitePool,
    user_id: i64,
    city: &str,
    area: &str,
    address: &str,
    postal_code: Option<&str>,
) -> RepoResult<()> {
    let existing: Option<i64> = sqlx::query_scalar(
        "SELECT id FROM user_address WHERE user_id = ?1 AND city = ?2 AND area = ?3 AND address = ?4 AND COALESCE(postal_code, '') = COALESCE(?5, '')",
    )
    .bind(user_id)
    .bind(city)
    .bind(area)
    .bind(address)
    .bind(postal_code)
    .fetch_optional(pool)
    .await?;
    if existing.is_some() {
        return Ok(());
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user_address (id, user_id, city, area, address, postal_code, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(id)
    .bind(user_id)
    .bind(city)
    .bind(area)
    .bind(address)
    .bind(postal_code)
    .bind(now)
    .execute(pool)
    .await?;

    // FIFO eviction past 5 saved addresses
    sqlx::query(
        "DELETE FROM user_address WHERE user_id = ?1 AND id NOT IN (SELECT id FROM user_address WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT 5)",
    )
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}
