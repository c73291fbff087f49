//! Warehouse Repository

use super::{RepoError, RepoResult};
use shared::models::{Warehouse, WarehouseProduct};
use sqlx::SqlitePool;

const WAREHOUSE_SELECT: &str =
    "SELECT id, name_en, name_ar, address, quantity, created_at, updated_at FROM warehouse";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Warehouse>> {
    let sql = format!("{WAREHOUSE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Warehouse>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn list(pool: &SqlitePool, page: u32, per_page: u32) -> RepoResult<(Vec<Warehouse>, u64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM warehouse")
        .fetch_one(pool)
        .await?;
    let offset = (page.saturating_sub(1) as i64) * per_page as i64;
    let sql = format!("{WAREHOUSE_SELECT} ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Warehouse>(&sql)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok((rows, total as u64))
}

pub async fn create(
    pool: &SqlitePool,
    name_en: &str,
    name_ar: &str,
    address: Option<&str>,
) -> RepoResult<Warehouse> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO warehouse (id, name_en, name_ar, address, quantity, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)",
    )
    .bind(id)
    .bind(name_en)
    .bind(name_ar)
    .bind(address)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create warehouse".into()))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    sqlx::query("DELETE FROM warehouse_product WHERE warehouse_id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    let rows = sqlx::query("DELETE FROM warehouse WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

pub async fn stock(
    pool: &SqlitePool,
    warehouse_id: i64,
    product_id: i64,
) -> RepoResult<Option<WarehouseProduct>> {
    let row = sqlx::query_as::<_, WarehouseProduct>(
        "SELECT warehouse_id, product_id, quantity FROM warehouse_product WHERE warehouse_id = ? AND product_id = ?",
    )
    .bind(warehouse_id)
    .bind(product_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn stocks(pool: &SqlitePool, warehouse_id: i64) -> RepoResult<Vec<WarehouseProduct>> {
    let rows = sqlx::query_as::<_, WarehouseProduct>(
        "SELECT warehouse_id, product_id, quantity FROM warehouse_product WHERE warehouse_id = ? ORDER BY product_id ASC",
    )
    .bind(warehouse_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

/// Add product stock to a warehouse (upsert) and bump the warehouse total
pub async fn add_stock(
    conn: &mut sqlx::SqliteConnection,
    warehouse_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO warehouse_product (warehouse_id, product_id, quantity) VALUES (?1, ?2, ?3) ON CONFLICT(warehouse_id, product_id) DO UPDATE SET quantity = quantity + excluded.quantity",
    )
    .bind(warehouse_id)
    .bind(product_id)
    .bind(quantity)
    .execute(&mut *conn)
    .await?;

    let now = shared::util::now_millis();
    sqlx::query("UPDATE warehouse SET quantity = quantity + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(quantity)
        .bind(now)
        .bind(warehouse_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Conditionally take stock out of one warehouse. Returns false when the
/// warehouse lacks the requested amount, leaving the row untouched.
pub async fn try_decrement_stock(
    conn: &mut sqlx::SqliteConnection,
    warehouse_id: i64,
    product_id: i64,
    quantity: i64,
) -> RepoResult<bool> {
    let rows = sqlx::query(
        "UPDATE warehouse_product SET quantity = quantity - ?1 WHERE warehouse_id = ?2 AND product_id = ?3 AND quantity >= ?1",
    )
    .bind(quantity)
    .bind(warehouse_id)
    .bind(product_id)
    .execute(&mut *conn)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(false);
    }

    let now = shared::util::now_millis();
    sqlx::query("UPDATE warehouse SET quantity = quantity - ?1, updated_at = ?2 WHERE id = ?3")
        .bind(quantity)
        .bind(now)
        .bind(warehouse_id)
        .execute(conn)
        .await?;
    Ok(true)
}
