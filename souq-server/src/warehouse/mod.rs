//! Warehouse reservation engine
//!
//! Two guarded flows: moving product stock into a warehouse (bounded by the
//! product's unreserved stock) and assigning an order's lines out of
//! warehouses (all lines or none).

use serde::Deserialize;
use shared::models::Warehouse;
use sqlx::SqlitePool;
use validator::Validate;

use crate::db::repository::{order, product, warehouse};
use crate::utils::{AppError, AppResult};

/// One line of an order-to-warehouse assignment
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct Assignment {
    pub warehouse_id: i64,
    pub product_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i64,
}

/// Put `quantity` units of a product into a warehouse. The conditional
/// update on the product keeps the total reserved across all warehouses
/// within the product's stock, even under concurrent requests.
pub async fn add_product_stock(
    pool: &SqlitePool,
    warehouse_id: i64,
    product_id: i64,
    quantity: i64,
) -> AppResult<Warehouse> {
    if quantity < 1 {
        return Err(AppError::validation(
            "Quantity must be at least 1",
            "الكمية يجب أن تكون 1 على الأقل",
        ));
    }
    warehouse::find_by_id(pool, warehouse_id)
        .await?
        .ok_or_else(|| AppError::not_found("Warehouse Not Found", "المستودع غير موجود"))?;
    product::find_by_id(pool, product_id)
        .await?
        .ok_or_else(|| AppError::not_found("Product Not Found", "المنتج غير موجود"))?;

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    if !product::try_reserve_repo_stock(&mut *tx, product_id, quantity).await? {
        tx.rollback().await.map_err(AppError::from)?;
        return Err(AppError::business_rule(
            "Quantity exceeds the product's unreserved stock",
            "الكمية تتجاوز المخزون غير المحجوز للمنتج",
        ));
    }
    warehouse::add_stock(&mut tx, warehouse_id, product_id, quantity).await?;
    tx.commit().await.map_err(AppError::from)?;

    warehouse::find_by_id(pool, warehouse_id)
        .await?
        .ok_or_else(|| AppError::internal("Warehouse vanished after stocking"))
}

/// Take an order's lines out of warehouses, all or nothing. Any warehouse
/// coming up short rolls the whole assignment back untouched.
pub async fn assign_order_items(
    pool: &SqlitePool,
    order_id: i64,
    assignments: Vec<Assignment>,
) -> AppResult<()> {
    order::find_by_id(pool, order_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;
    if assignments.is_empty() {
        return Err(AppError::validation(
            "No assignments given",
            "لا توجد تخصيصات",
        ));
    }
    for a in &assignments {
        a.validate()?;
    }

    let mut tx = pool.begin().await.map_err(AppError::from)?;
    for a in &assignments {
        if !warehouse::try_decrement_stock(&mut tx, a.warehouse_id, a.product_id, a.quantity)
            .await?
        {
            tx.rollback().await.map_err(AppError::from)?;
            return Err(AppError::business_rule(
                format!(
                    "Warehouse {} lacks {} units of product {}",
                    a.warehouse_id, a.quantity, a.product_id
                ),
                "المستودع لا يملك الكمية المطلوبة",
            ));
        }
        product::release_repo_stock(&mut *tx, a.product_id, a.quantity).await?;
    }
    tx.commit().await.map_err(AppError::from)?;
    Ok(())
}
