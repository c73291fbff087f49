//! Product Model

use serde::{Deserialize, Serialize};
use sqlx::types::Json;

/// Which payment channel a product may be bought through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentKind {
    Online,
    Cash,
    Both,
}

impl PaymentKind {
    /// Products payable online (or both) share the online cart channel
    pub fn is_online_capable(&self) -> bool {
        matches!(self, PaymentKind::Online | PaymentKind::Both)
    }
}

/// One selectable value of a variant group, with its price surcharge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityValue {
    pub value: String,
    #[serde(default)]
    pub price: i64,
}

/// A variant group offered by a product, e.g. key "size" with values S/M/L
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quality {
    pub key: String,
    pub values: Vec<QualityValue>,
}

/// A variant choice attached to a cart item, e.g. {"size", "L"}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenProperty {
    pub key: String,
    pub value: String,
}

/// Product entity.
///
/// `quantity` is the total stock; `repo_quantity` is the portion already
/// placed in warehouses (`repo_quantity <= quantity` always holds).
/// Prices are integer currency units.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: i64,
    pub title_en: String,
    pub title_ar: String,
    pub price_before_discount: i64,
    pub price_after_discount: Option<i64>,
    pub shipping_price: i64,
    pub quantity: i64,
    pub repo_quantity: i64,
    pub sales: i64,
    pub payment_kind: PaymentKind,
    pub category_id: Option<i64>,
    pub sub_category_id: Option<i64>,
    pub brand_id: Option<i64>,
    pub qualities: Json<Vec<Quality>>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Product {
    /// Effective unit price: the discounted price when one is set
    pub fn unit_price(&self) -> i64 {
        self.price_after_discount
            .unwrap_or(self.price_before_discount)
    }
}
