//! User Model

use serde::{Deserialize, Serialize};

/// Account role. Admin tiers mirror the storefront back-office hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
pub enum Role {
    #[serde(rename = "rootAdmin")]
    #[sqlx(rename = "rootAdmin")]
    RootAdmin,
    #[serde(rename = "adminA")]
    #[sqlx(rename = "adminA")]
    AdminA,
    #[serde(rename = "adminB")]
    #[sqlx(rename = "adminB")]
    AdminB,
    #[serde(rename = "adminC")]
    #[sqlx(rename = "adminC")]
    AdminC,
    #[serde(rename = "subAdmin")]
    #[sqlx(rename = "subAdmin")]
    SubAdmin,
    #[serde(rename = "user")]
    #[sqlx(rename = "user")]
    User,
    #[serde(rename = "guest")]
    #[sqlx(rename = "guest")]
    Guest,
    #[serde(rename = "marketer")]
    #[sqlx(rename = "marketer")]
    Marketer,
}

impl Role {
    /// Roles allowed to manage catalog, coupons, warehouses and points
    pub const ADMINS: &[Role] = &[
        Role::RootAdmin,
        Role::AdminA,
        Role::AdminB,
        Role::AdminC,
        Role::SubAdmin,
    ];

    pub fn is_admin(&self) -> bool {
        Self::ADMINS.contains(self)
    }
}

/// User entity. `points` and `revenue` are credited at order settlement;
/// `total_commission` accumulates for marketer accounts.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub points: i64,
    pub revenue: i64,
    pub total_commission: i64,
    pub marketer_coupon_id: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Saved shipping address. Each user keeps at most five; the oldest row is
/// evicted when a sixth distinct address arrives.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserAddress {
    pub id: i64,
    pub user_id: i64,
    pub city: String,
    pub area: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub created_at: i64,
}
