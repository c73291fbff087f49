//! Points API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::models::{PointsConfig, PointsMode, StaticPointRequest};
use shared::response::{ApiResponse, PaginatedResponse};
use validator::Validate;

use crate::api::PageQuery;
use crate::api::auth::{Admin, CurrentUser};
use crate::carts::CartView;
use crate::core::ServerState;
use crate::db::repository::points as points_repo;
use crate::points;
use crate::utils::{AppResult, ok, ok_with_message};

#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ConfigUpdate {
    #[validate(range(min = 1))]
    pub points_per_unit: Option<i64>,
    #[validate(range(min = 0))]
    pub points_per_currency_unit: Option<i64>,
    #[validate(range(min = 0))]
    pub min_points: Option<i64>,
    #[validate(range(min = 1))]
    pub max_points: Option<i64>,
    pub mode: Option<PointsMode>,
}

/// grantPoints 的两种结果：动态抵扣后的购物车，或排队等待受理的兑现申请
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum GrantOutcome {
    Redeemed(CartView),
    Requested(StaticPointRequest),
}

/// POST /api/v1/pointsManagement/grantPoints - 按配置模式兑换积分
pub async fn grant_points(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<ApiResponse<GrantOutcome>>> {
    let config = points_repo::get_config(&state.pool).await?;
    match config.mode {
        PointsMode::Dynamic => {
            let view = points::redeem_on_cart(&state.pool, user.id).await?;
            Ok(ok_with_message(
                GrantOutcome::Redeemed(view),
                "points redeemed successfully",
                "تم استبدال النقاط بنجاح",
            ))
        }
        PointsMode::Static => {
            let request = points::request_static_payout(&state.pool, user.id).await?;
            Ok(ok_with_message(
                GrantOutcome::Requested(request),
                "request submitted successfully",
                "تم تقديم الطلب بنجاح",
            ))
        }
    }
}

/// GET /api/v1/pointsManagement/requests - 兑现申请列表（管理员）
pub async fn list_requests(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<ApiResponse<PaginatedResponse<StaticPointRequest>>>> {
    let (items, total) =
        points_repo::list_static_requests(&state.pool, query.page, query.per_page).await?;
    Ok(ok(PaginatedResponse::new(
        items,
        query.page,
        query.per_page,
        total,
    )))
}

/// POST /api/v1/pointsManagement/requests/:id/accept - 受理兑现申请（管理员）
pub async fn accept_request(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<StaticPointRequest>>> {
    let request = points::accept_static_request(&state.pool, id).await?;
    Ok(ok_with_message(
        request,
        "request accepted successfully",
        "تم قبول الطلب بنجاح",
    ))
}

/// POST /api/v1/pointsManagement/requests/:id/reject - 驳回兑现申请并退还积分（管理员）
pub async fn reject_request(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<StaticPointRequest>>> {
    let request = points::reject_static_request(&state.pool, id).await?;
    Ok(ok_with_message(
        request,
        "request rejected successfully",
        "تم رفض الطلب بنجاح",
    ))
}

/// GET /api/v1/pointsManagement/config - 读取积分配置（管理员）
pub async fn get_config(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
) -> AppResult<Json<ApiResponse<PointsConfig>>> {
    let cfg = points_repo::get_config(&state.pool).await?;
    Ok(ok(cfg))
}

/// PUT /api/v1/pointsManagement/config - 更新积分配置（管理员）
pub async fn update_config(
    State(state): State<ServerState>,
    Admin(_admin): Admin,
    Json(payload): Json<ConfigUpdate>,
) -> AppResult<Json<ApiResponse<PointsConfig>>> {
    payload.validate()?;
    let cfg = points_repo::update_config(
        &state.pool,
        payload.points_per_unit,
        payload.points_per_currency_unit,
        payload.min_points,
        payload.max_points,
        payload.mode,
    )
    .await?;
    Ok(ok_with_message(
        cfg,
        "updated successfully",
        "تم التعديل بنجاح",
    ))
}
