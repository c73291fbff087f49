//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/orders", routes())
}

fn routes() -> Router<ServerState> {
    // 用户路由
    let user_routes = Router::new()
        .route("/", post(handler::create))
        .route("/verifyOrder", post(handler::verify))
        .route("/createOnlineOrder", post(handler::create_online_order))
        .route("/myOrders", get(handler::my_orders))
        .route("/{id}", get(handler::get_by_id))
        .route("/trackOrder/{id}", get(handler::track));

    // 管理路由
    let manage_routes = Router::new()
        .route("/{id}", delete(handler::delete))
        .route("/{id}/status", put(handler::update_status))
        .route("/{id}/shipping", post(handler::ship))
        .route("/createItemRepository", post(handler::assign_warehouses));

    user_routes.merge(manage_routes)
}
