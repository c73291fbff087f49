//! Order Model

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

use super::product::{ChosenProperty, PaymentKind};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
pub enum OrderStatus {
    #[serde(rename = "initiated")]
    #[sqlx(rename = "initiated")]
    Initiated,
    #[serde(rename = "created")]
    #[sqlx(rename = "created")]
    Created,
    #[serde(rename = "on going")]
    #[sqlx(rename = "on going")]
    OnGoing,
    #[serde(rename = "on delivered")]
    #[sqlx(rename = "on delivered")]
    OnDelivered,
    #[serde(rename = "completed")]
    #[sqlx(rename = "completed")]
    Completed,
    #[serde(rename = "refund")]
    #[sqlx(rename = "refund")]
    Refund,
}

/// Payment settlement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PaymentStatus {
    PaymentNotPaid,
    PaymentPaid,
    PaymentFailed,
}

/// Cart/order channel an item settles through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Channel {
    Online,
    Cash,
}

/// Order entity — a priced snapshot of the cart at creation time, split into
/// online and cash channels. Money already deducted by points lives in the
/// channel totals, never recomputed afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub cart_id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub city: String,
    pub area: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub order_notes: Option<String>,
    pub total_price: i64,
    pub total_quantity: i64,
    pub online_total: i64,
    pub online_quantity: i64,
    pub cash_total: i64,
    pub cash_quantity: i64,
    pub verification_code_hash: Option<String>,
    pub verification_expires_at: i64,
    pub is_verified: bool,
    pub payment_kind: PaymentKind,
    pub payment_status: PaymentStatus,
    pub status: OrderStatus,
    pub pay_with_type: Option<String>,
    pub pay_with_source: Option<Json<serde_json::Value>>,
    pub invoice_id: Option<String>,
    pub send_to_delivery: bool,
    pub tracking: Option<Json<serde_json::Value>>,
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line snapshot, tagged with the channel it settles through
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub channel: Channel,
    pub product_id: i64,
    pub quantity: i64,
    pub total: i64,
    pub properties: Json<Vec<ChosenProperty>>,
}
