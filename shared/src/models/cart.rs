//! Cart Model

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::product::ChosenProperty;

/// Cart entity — one active cart per user.
///
/// `coupon_commission` holds the exact (unfloored) marketing commission as a
/// decimal string; it is floored only when paid out at settlement.
/// `total_used_from_points` is the amount already subtracted from
/// `total_price` by a points redemption.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub total_price: i64,
    pub coupon_id: Option<i64>,
    pub coupon_used: bool,
    pub coupon_commission: Option<String>,
    pub is_points_used: bool,
    pub total_used_from_points: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Cart line — unique per (cart, product); `total` is the priced line total
/// with variant surcharges and shipping included.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CartItem {
    pub id: i64,
    pub cart_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub total: i64,
    pub properties: Json<Vec<ChosenProperty>>,
}
