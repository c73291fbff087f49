//! Catalog Repository (categories / sub-categories / brands)
//!
//! Settlement credits category revenue here; coupon selectors resolve
//! through the product repository.

use super::RepoResult;
use shared::models::Category;
use sqlx::{SqliteExecutor, SqlitePool};

pub async fn find_category(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(
        "SELECT id, name_en, name_ar, revenue, created_at, updated_at FROM category WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Credit revenue earned by products of this category at settlement
pub async fn credit_category_revenue<'e, E: SqliteExecutor<'e>>(
    ex: E,
    category_id: i64,
    amount: i64,
) -> RepoResult<()> {
    let now = shared::util::now_millis();
    sqlx::query("UPDATE category SET revenue = revenue + ?1, updated_at = ?2 WHERE id = ?3")
        .bind(amount)
        .bind(now)
        .bind(category_id)
        .execute(ex)
        .await?;
    Ok(())
}
