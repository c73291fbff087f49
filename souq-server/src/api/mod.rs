//! HTTP API
//!
//! One module per resource, each with a `router()` and its handlers.
//! Everything is nested under `/api/v1`.

pub mod auth;
pub mod cart;
pub mod coupons;
pub mod orders;
pub mod points;
pub mod products;
pub mod warehouses;
pub mod webhooks;

use axum::Router;
use serde::Deserialize;

use crate::core::ServerState;

/// 列表接口通用分页参数
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

pub fn router() -> Router<ServerState> {
    Router::new()
        .merge(cart::router())
        .merge(coupons::router())
        .merge(orders::router())
        .merge(points::router())
        .merge(products::router())
        .merge(warehouses::router())
        .merge(webhooks::router())
}
