//! Coupon Model

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Coupon kind. Normal coupons have a validity window and per-user usage
/// limit; marketing coupons belong to a marketer and accrue commission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum CouponKind {
    Normal,
    Marketing,
}

/// Coupon entity. `products` is the resolved id set the coupon applies to,
/// materialized from the department selector at create/update time.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Coupon {
    pub id: i64,
    pub code: String,
    pub kind: CouponKind,
    /// Percent discount, 1..=99
    pub discount: i64,
    /// Per-user usage limit (normal coupons)
    pub usage_limit: i64,
    pub starts_at: Option<i64>,
    pub ends_at: Option<i64>,
    pub marketer_id: Option<i64>,
    /// Marketer commission percent of the pre-discount eligible total
    pub commission_percent: Option<i64>,
    pub products: Json<Vec<i64>>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Per-user usage counter; the conditional increment on this row is what
/// enforces the usage limit under concurrency.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CouponUsage {
    pub coupon_id: i64,
    pub user_id: i64,
    pub used_count: i64,
}
