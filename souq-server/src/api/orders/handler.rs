//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Order, OrderStatus};
use shared::response::{ApiResponse, PaginatedResponse};

use crate::api::PageQuery;
use crate::api::auth::{Admin, CurrentUser};
use crate::core::ServerState;
use crate::db::repository::order;
use crate::orders::{
    self, OnlineInvoice, OrderCreate, VerifyOrder, create_order, create_online_invoice,
    verify_order,
};
use crate::utils::{AppError, AppResult, ok, ok_with_message};
use crate::warehouse::{self, Assignment};

/// POST /api/v1/orders - 从购物车创建订单
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let created = create_order(&state, user.id, payload).await?;
    Ok(ok_with_message(
        created,
        "created successfully",
        "تم الانشاء بنجاح",
    ))
}

/// POST /api/v1/orders/verifyOrder - 校验短信验证码
pub async fn verify(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<VerifyOrder>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let verified = verify_order(&state, user.id, payload).await?;
    Ok(ok_with_message(
        verified,
        "verified successfully",
        "تم التحقق بنجاح",
    ))
}

/// GET /api/v1/orders/myOrders - 当前用户订单列表
pub async fn my_orders(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<Order>>>> {
    let (items, total) =
        order::list_by_user(&state.pool, user.id, query.page, query.per_page).await?;
    Ok(ok(PaginatedResponse::new(
        items,
        query.page,
        query.per_page,
        total,
    )))
}

/// GET /api/v1/orders/:id - 订单详情（本人或管理员）
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order_row = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;
    if order_row.user_id != user.id && !user.role.is_admin() {
        return Err(AppError::forbidden(
            "This order belongs to another user",
            "هذا الطلب يخص مستخدمًا آخر",
        ));
    }
    Ok(ok(order_row))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateOnlineOrder {
    pub order_id: i64,
}

/// POST /api/v1/orders/createOnlineOrder - 为已验证订单创建在线支付发票
pub async fn create_online_order(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CreateOnlineOrder>,
) -> AppResult<Json<ApiResponse<OnlineInvoice>>> {
    let invoice = create_online_invoice(&state, user.id, payload.order_id).await?;
    Ok(ok_with_message(
        invoice,
        "invoice created successfully",
        "تم إنشاء الفاتورة بنجاح",
    ))
}

/// GET /api/v1/orders/trackOrder/:id - 物流跟踪
pub async fn track(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let order_row = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;
    if order_row.user_id != user.id && !user.role.is_admin() {
        return Err(AppError::forbidden(
            "This order belongs to another user",
            "هذا الطلب يخص مستخدمًا آخر",
        ));
    }
    let tracking = orders::track_order(&state, id).await?;
    Ok(ok(tracking))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// PUT /api/v1/orders/:id/status - 更新订单状态（管理员）
pub async fn update_status(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
    Json(payload): Json<StatusUpdate>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let status = match serde_json::to_value(payload.status) {
        Ok(serde_json::Value::String(s)) => s,
        _ => return Err(AppError::internal("Unserializable order status")),
    };
    if !order::update_status(&state.pool, id, &status).await? {
        return Err(AppError::not_found("Order Not Found", "الطلب غير موجود"));
    }
    let order_row = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Order Not Found", "الطلب غير موجود"))?;
    Ok(ok_with_message(
        order_row,
        "updated successfully",
        "تم التعديل بنجاح",
    ))
}

/// DELETE /api/v1/orders/:id - 软删除订单（管理员）
pub async fn delete(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let deleted = order::soft_delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Order Not Found", "الطلب غير موجود"));
    }
    Ok(ok_with_message(
        deleted,
        "deleted successfully",
        "تم الحذف بنجاح",
    ))
}

/// POST /api/v1/orders/:id/shipping - 移交物流（管理员）
pub async fn ship(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let shipped = orders::send_to_delivery(&state, id).await?;
    Ok(ok_with_message(
        shipped,
        "sent to delivery successfully",
        "تم الإرسال للتوصيل بنجاح",
    ))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssignmentRequest {
    pub order_id: i64,
    pub assignments: Vec<Assignment>,
}

/// POST /api/v1/orders/createItemRepository - 从仓库分配订单货品（管理员）
pub async fn assign_warehouses(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Json(payload): Json<AssignmentRequest>,
) -> AppResult<Json<ApiResponse<()>>> {
    warehouse::assign_order_items(&state.pool, payload.order_id, payload.assignments).await?;
    Ok(ok_with_message(
        (),
        "assigned successfully",
        "تم التخصيص بنجاح",
    ))
}
