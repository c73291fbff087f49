//! Warehouse API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Warehouse, WarehouseProduct};
use shared::response::{ApiResponse, PaginatedResponse};
use validator::Validate;

use crate::api::PageQuery;
use crate::api::auth::Admin;
use crate::core::ServerState;
use crate::db::repository::warehouse;
use crate::utils::validation::{MAX_ADDRESS_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text};
use crate::utils::{AppError, AppResult, ok, ok_with_message};
use crate::warehouse as warehouse_service;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarehouseCreate {
    pub name_en: String,
    pub name_ar: String,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct StockRequest {
    pub product_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i64,
}

/// GET /api/v1/warehouses - 仓库列表（管理员）
pub async fn list(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<Warehouse>>>> {
    let (items, total) = warehouse::list(&state.pool, query.page, query.per_page).await?;
    Ok(ok(PaginatedResponse::new(
        items,
        query.page,
        query.per_page,
        total,
    )))
}

/// GET /api/v1/warehouses/:id - 仓库详情（管理员）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Warehouse>>> {
    let row = warehouse::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Warehouse Not Found", "المستودع غير موجود"))?;
    Ok(ok(row))
}

/// POST /api/v1/warehouses - 创建仓库（管理员）
pub async fn create(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Json(payload): Json<WarehouseCreate>,
) -> AppResult<Json<ApiResponse<Warehouse>>> {
    validate_required_text(&payload.name_en, "name_en", MAX_NAME_LEN)?;
    validate_required_text(&payload.name_ar, "name_ar", MAX_NAME_LEN)?;
    validate_optional_text(&payload.address, "address", MAX_ADDRESS_LEN)?;
    let created = warehouse::create(
        &state.pool,
        &payload.name_en,
        &payload.name_ar,
        payload.address.as_deref(),
    )
    .await?;
    Ok(ok_with_message(
        created,
        "created successfully",
        "تم الانشاء بنجاح",
    ))
}

/// DELETE /api/v1/warehouses/:id - 删除仓库及其库存记录（管理员）
pub async fn delete(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let deleted = warehouse::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found(
            "Warehouse Not Found",
            "المستودع غير موجود",
        ));
    }
    Ok(ok_with_message(
        deleted,
        "deleted successfully",
        "تم الحذف بنجاح",
    ))
}

/// GET /api/v1/warehouses/:id/stocks - 仓库库存明细（管理员）
pub async fn stocks(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Vec<WarehouseProduct>>>> {
    warehouse::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Warehouse Not Found", "المستودع غير موجود"))?;
    let rows = warehouse::stocks(&state.pool, id).await?;
    Ok(ok(rows))
}

/// POST /api/v1/warehouses/:id/stocks - 向仓库调拨商品库存（管理员）
pub async fn add_stock(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
    Json(payload): Json<StockRequest>,
) -> AppResult<Json<ApiResponse<Warehouse>>> {
    payload.validate()?;
    let updated =
        warehouse_service::add_product_stock(&state.pool, id, payload.product_id, payload.quantity)
            .await?;
    Ok(ok_with_message(
        updated,
        "stocked successfully",
        "تم التخزين بنجاح",
    ))
}
