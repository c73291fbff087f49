//! Coupon API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::models::Coupon;
use shared::response::{ApiResponse, PaginatedResponse};

use crate::api::PageQuery;
use crate::api::auth::{Admin, CurrentUser};
use crate::core::ServerState;
use crate::coupons::{self, CouponCreate, CouponPreview, CouponUpdate};
use crate::db::repository::coupon;
use crate::utils::{AppError, AppResult, ok, ok_with_message};

/// GET /api/v1/coupons/byCode/:code - 使用前校验优惠券（不计次数）
pub async fn precheck(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(code): Path<String>,
) -> AppResult<Json<ApiResponse<CouponPreview>>> {
    let preview = coupons::precheck(&state.pool, user.id, &code).await?;
    Ok(ok(preview))
}

/// GET /api/v1/coupons - 优惠券列表（管理员）
pub async fn list(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<Coupon>>>> {
    let (items, total) = coupon::list(&state.pool, query.page, query.per_page).await?;
    Ok(ok(PaginatedResponse::new(
        items,
        query.page,
        query.per_page,
        total,
    )))
}

/// GET /api/v1/coupons/:id - 优惠券详情（管理员）
pub async fn get_by_id(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let row = coupon::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Coupon Not Found", "الكوبون غير موجود"))?;
    Ok(ok(row))
}

/// POST /api/v1/coupons - 创建优惠券（管理员）
pub async fn create(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Json(payload): Json<CouponCreate>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let created = coupons::create(&state.pool, payload).await?;
    Ok(ok_with_message(
        created,
        "created successfully",
        "تم الانشاء بنجاح",
    ))
}

/// PUT /api/v1/coupons/:id - 更新优惠券（管理员）
pub async fn update(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
    Json(payload): Json<CouponUpdate>,
) -> AppResult<Json<ApiResponse<Coupon>>> {
    let updated = coupons::update(&state.pool, id, payload).await?;
    Ok(ok_with_message(
        updated,
        "updated successfully",
        "تم التعديل بنجاح",
    ))
}

/// DELETE /api/v1/coupons/:id - 删除优惠券及其使用记录（管理员）
pub async fn delete(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<bool>>> {
    let deleted = coupon::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::not_found("Coupon Not Found", "الكوبون غير موجود"));
    }
    Ok(ok_with_message(
        deleted,
        "deleted successfully",
        "تم الحذف بنجاح",
    ))
}
