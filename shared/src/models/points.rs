//! Loyalty Points Model

use serde::{Deserialize, Serialize};

/// Redemption mode: dynamic converts points at checkout, static goes through
/// an admin-approved cash-out request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PointsMode {
    Static,
    Dynamic,
}

/// Singleton (id = 1) loyalty configuration.
///
/// `points_per_currency_unit` is how many points convert into one currency
/// unit; `points_per_unit` is how many points one spent currency unit earns.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PointsConfig {
    pub id: i64,
    pub points_per_unit: i64,
    pub points_per_currency_unit: i64,
    pub min_points: i64,
    pub max_points: i64,
    pub mode: PointsMode,
}

/// A pending static cash-out request awaiting admin review
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StaticPointRequest {
    pub id: i64,
    pub user_id: i64,
    pub points: i64,
    pub amount: i64,
    pub status: String,
    pub created_at: i64,
}
