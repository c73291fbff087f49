//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::Product;
use shared::response::{ApiResponse, PaginatedResponse};

use crate::api::PageQuery;
use crate::api::auth::Admin;
use crate::core::ServerState;
use crate::db::repository::product::{self, ProductCreate, ProductUpdate};
use crate::utils::{AppError, AppResult, ok, ok_with_message};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

/// GET /api/v1/products - 商品列表（公开）
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<Product>>>> {
    let (items, total) = product::list(&state.pool, query.page, query.per_page).await?;
    Ok(ok(PaginatedResponse::new(
        items,
        query.page,
        query.per_page,
        total,
    )))
}

/// GET /api/v1/products/:id - 商品详情（公开）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Product>>> {
    let row = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Product Not Found", "المنتج غير موجود"))?;
    Ok(ok(row))
}

/// POST /api/v1/products - 创建商品（管理员）
pub async fn create(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    validate_required_text(&payload.title_en, "title_en", MAX_NAME_LEN)?;
    validate_required_text(&payload.title_ar, "title_ar", MAX_NAME_LEN)?;
    if payload.price_before_discount < 0 || payload.quantity < 0 {
        return Err(AppError::validation(
            "Price and quantity must not be negative",
            "يجب ألا يكون السعر والكمية سالبين",
        ));
    }
    let created = product::create(&state.pool, payload).await?;
    Ok(ok_with_message(
        created,
        "created successfully",
        "تم الانشاء بنجاح",
    ))
}

/// PUT /api/v1/products/:id - 部分更新商品（管理员）
pub async fn update(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ApiResponse<Product>>> {
    if payload.price_before_discount.is_some_and(|p| p < 0)
        || payload.quantity.is_some_and(|q| q < 0)
    {
        return Err(AppError::validation(
            "Price and quantity must not be negative",
            "يجب ألا يكون السعر والكمية سالبين",
        ));
    }
    let updated = product::update(&state.pool, id, payload).await?;
    Ok(ok_with_message(
        updated,
        "updated successfully",
        "تم التعديل بنجاح",
    ))
}

/// DELETE /api/v1/products/:id - 下架商品（软删除，管理员）
pub async fn delete(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let deleted = product::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Product Not Found", "المنتج غير موجود"));
    }
    Ok(ok_with_message(
        deleted,
        "deleted successfully",
        "تم الحذف بنجاح",
    ))
}
