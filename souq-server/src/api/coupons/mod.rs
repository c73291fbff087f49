//! Coupon API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/coupons", routes())
}

fn routes() -> Router<ServerState> {
    // 用户路由
    let user_routes = Router::new().route("/byCode/{code}", get(handler::precheck));

    // 管理路由
    let manage_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        );

    user_routes.merge(manage_routes)
}
