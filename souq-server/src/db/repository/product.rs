//! Product Repository

use super::{RepoError, RepoResult};
use serde::Deserialize;
use shared::models::{PaymentKind, Product, Quality};
use sqlx::types::Json;
use sqlx::{SqliteExecutor, SqlitePool};

const PRODUCT_SELECT: &str = "SELECT id, title_en, title_ar, price_before_discount, price_after_discount, shipping_price, quantity, repo_quantity, sales, payment_kind, category_id, sub_category_id, brand_id, qualities, is_active, created_at, updated_at FROM product";

/// Create product payload
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductCreate {
    pub title_en: String,
    pub title_ar: String,
    pub price_before_discount: i64,
    pub price_after_discount: Option<i64>,
    #[serde(default)]
    pub shipping_price: i64,
    pub quantity: i64,
    pub payment_kind: PaymentKind,
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub brand_id: Option<i64>,
    #[serde(default)]
    pub qualities: Vec<Quality>,
}

/// Update product payload (partial)
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    pub title_en: Option<String>,
    pub title_ar: Option<String>,
    pub price_before_discount: Option<i64>,
    pub price_after_discount: Option<i64>,
    pub shipping_price: Option<i64>,
    pub quantity: Option<i64>,
    pub payment_kind: Option<PaymentKind>,
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub qualities: Option<Vec<Quality>>,
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ? AND is_active = 1");
    let row = sqlx::query_as::<_, Product>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_ids(pool: &SqlitePool, ids: &[i64]) -> RepoResult<Vec<Product>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!("{PRODUCT_SELECT} WHERE is_active = 1 AND id IN ({placeholders})");
    let mut query = sqlx::query_as::<_, Product>(&sql);
    for id in ids {
        query = query.bind(id);
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn all_ids(pool: &SqlitePool) -> RepoResult<Vec<i64>> {
    let ids = sqlx::query_scalar("SELECT id FROM product WHERE is_active = 1")
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

pub async fn ids_by_categories(pool: &SqlitePool, category_ids: &[i64]) -> RepoResult<Vec<i64>> {
    ids_by_column(pool, "category_id", category_ids).await
}

pub async fn ids_by_sub_categories(
    pool: &SqlitePool,
    sub_category_ids: &[i64],
) -> RepoResult<Vec<i64>> {
    ids_by_column(pool, "sub_category_id", sub_category_ids).await
}

async fn ids_by_column(pool: &SqlitePool, column: &str, values: &[i64]) -> RepoResult<Vec<i64>> {
    if values.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; values.len()].join(", ");
    let sql =
        format!("SELECT id FROM product WHERE is_active = 1 AND {column} IN ({placeholders})");
    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for v in values {
        query = query.bind(v);
    }
    Ok(query.fetch_all(pool).await?)
}

pub async fn list(pool: &SqlitePool, page: u32, per_page: u32) -> RepoResult<(Vec<Product>, u64)> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM product WHERE is_active = 1")
        .fetch_one(pool)
        .await?;
    let offset = (page.saturating_sub(1) as i64) * per_page as i64;
    let sql = format!("{PRODUCT_SELECT} WHERE is_active = 1 ORDER BY created_at DESC LIMIT ? OFFSET ?");
    let rows = sqlx::query_as::<_, Product>(&sql)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok((rows, total as u64))
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO product (id, title_en, title_ar, price_before_discount, price_after_discount, shipping_price, quantity, repo_quantity, sales, payment_kind, category_id, sub_category_id, brand_id, qualities, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, 0, ?8, ?9, ?10, ?11, ?12, 1, ?13, ?13)",
    )
    .bind(id)
    .bind(&data.title_en)
    .bind(&data.title_ar)
    .bind(data.price_before_discount)
    .bind(data.price_after_discount)
    .bind(data.shipping_price)
    .bind(data.quantity)
    .bind(data.payment_kind)
    .bind(data.category_id)
    .bind(data.sub_category_id)
    .bind(data.brand_id)
    .bind(Json(&data.qualities))
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<Product> {
    let now = shared::util::now_millis();
    let qualities = data.qualities.map(Json);
    let rows = sqlx::query(
        "UPDATE product SET title_en = COALESCE(?1, title_en), title_ar = COALESCE(?2, title_ar), price_before_discount = COALESCE(?3, price_before_discount), price_after_discount = COALESCE(?4, price_after_discount), shipping_price = COALESCE(?5, shipping_price), quantity = COALESCE(?6, quantity), payment_kind = COALESCE(?7, payment_kind), category_id = COALESCE(?8, category_id), sub_category_id = COALESCE(?9, sub_category_id), brand_id = COALESCE(?10, brand_id), qualities = COALESCE(?11, qualities), updated_at = ?12 WHERE id = ?13 AND is_active = 1",
    )
    .bind(data.title_en)
    .bind(data.title_ar)
    .bind(data.price_before_discount)
    .bind(data.price_after_discount)
    .bind(data.shipping_price)
    .bind(data.quantity)
    .bind(data.payment_kind)
    .bind(data.category_id)
    .bind(data.sub_category_id)
    .bind(data.brand_id)
    .bind(qualities)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE product SET is_active = 0, updated_at = ? WHERE id = ? AND is_active = 1")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Settlement-time stock decrement and sales credit. Mirrors the webhook
/// side effects: no re-check of remaining stock happens here.
pub async fn settle_sale<'e, E: SqliteExecutor<'e>>(
    ex: E,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE product SET quantity = quantity - ?1, sales = sales + ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(ex)
    .await?;
    Ok(())
}

/// Move `quantity` units of total stock into warehouses. The guard keeps
/// `repo_quantity <= quantity` under concurrent reservations.
/// Stock left a warehouse for fulfilment; shrink the reserved share
pub async fn release_repo_stock<'e, E: SqliteExecutor<'e>>(
    ex: E,
    product_id: i64,
    quantity: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE product SET repo_quantity = repo_quantity - ?1, updated_at = ?2 WHERE id = ?3",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(ex)
    .await?;
    Ok(())
}

pub async fn try_reserve_repo_stock<'e, E: SqliteExecutor<'e>>(
    ex: E,
    product_id: i64,
    quantity: i64,
) -> RepoResult<bool> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET repo_quantity = repo_quantity + ?1, updated_at = ?2 WHERE id = ?3 AND repo_quantity + ?1 <= quantity",
    )
    .bind(quantity)
    .bind(now)
    .bind(product_id)
    .execute(ex)
    .await?;
    Ok(rows.rows_affected() > 0)
}
