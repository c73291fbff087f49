//! Warehouse Model

use serde::{Deserialize, Serialize};

/// Warehouse entity; `quantity` is the sum of its per-product stock rows
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Warehouse {
    pub id: i64,
    pub name_en: String,
    pub name_ar: String,
    pub address: Option<String>,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-warehouse stock of a product
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct WarehouseProduct {
    pub warehouse_id: i64,
    pub product_id: i64,
    pub quantity: i64,
}
