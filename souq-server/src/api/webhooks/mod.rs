//! Webhook API 模块
//!
//! 网关不注入用户头：回调来自外部收款方，按支付对象自身核验。

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/webhooks", routes())
}

fn routes() -> Router<ServerState> {
    Router::new().route("/payment", post(handler::payment))
}
