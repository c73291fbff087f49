//! Cart API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use shared::models::ChosenProperty;
use shared::response::ApiResponse;
use validator::Validate;

use crate::api::auth::CurrentUser;
use crate::carts::{self, CartView};
use crate::core::ServerState;
use crate::coupons;
use crate::utils::{AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AddToCart {
    #[validate(range(min = 1))]
    pub quantity: i64,
    #[serde(default)]
    pub properties: Vec<ChosenProperty>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ApplyCoupon {
    #[validate(length(min = 1, max = 100))]
    pub code: String,
}

/// POST /api/v1/cart/:product_id - 添加商品到购物车
pub async fn add_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<i64>,
    Json(payload): Json<AddToCart>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    payload.validate()?;
    let view = carts::add_item(
        &state.pool,
        user.id,
        product_id,
        payload.quantity,
        payload.properties,
    )
    .await?;
    Ok(ok_with_message(
        view,
        "added to cart successfully",
        "تمت الإضافة إلى السلة بنجاح",
    ))
}

/// GET /api/v1/cart - 查看购物车（按渠道拆分）
pub async fn view(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<CartView>>> {
    let view = carts::view(&state.pool, user.id).await?;
    Ok(ok(view))
}

/// DELETE /api/v1/cart/:product_id - 移除购物车商品
pub async fn remove_item(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(product_id): Path<i64>,
) -> AppResult<Json<ApiResponse<Option<CartView>>>> {
    let view = carts::remove_item(&state.pool, user.id, product_id).await?;
    Ok(ok_with_message(
        view,
        "removed from cart successfully",
        "تمت الإزالة من السلة بنجاح",
    ))
}

/// POST /api/v1/cart/verify - 在购物车上应用优惠券
pub async fn apply_coupon(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ApplyCoupon>,
) -> AppResult<Json<ApiResponse<CartView>>> {
    payload.validate()?;
    let view = coupons::apply_to_cart(&state.pool, user.id, &payload.code).await?;
    Ok(ok_with_message(
        view,
        "coupon applied successfully",
        "تم تطبيق الكوبون بنجاح",
    ))
}
