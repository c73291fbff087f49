//! Points API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/pointsManagement", routes())
}

fn routes() -> Router<ServerState> {
    // 用户路由：grantPoints 按配置模式分派（动态抵扣 / 静态兑现申请）
    let user_routes = Router::new().route("/grantPoints", post(handler::grant_points));

    // 管理路由
    let manage_routes = Router::new()
        .route("/requests", get(handler::list_requests))
        .route("/requests/{id}/accept", post(handler::accept_request))
        .route("/requests/{id}/reject", post(handler::reject_request))
        .route("/config", get(handler::get_config).put(handler::update_config));

    user_routes.merge(manage_routes)
}
