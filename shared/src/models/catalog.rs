//! Catalog Models (category / sub-category / brand)
//!
//! Minimal rows: coupons select by them and settlement credits category
//! revenue. Their full back-office CRUD lives elsewhere.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name_en: String,
    pub name_ar: String,
    pub revenue: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SubCategory {
    pub id: i64,
    pub category_id: i64,
    pub name_en: String,
    pub name_ar: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Brand {
    pub id: i64,
    pub name_en: String,
    pub name_ar: String,
    pub created_at: i64,
    pub updated_at: i64,
}
