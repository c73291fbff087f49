//! Request identity
//!
//! Authentication itself lives at the gateway; it forwards the
//! authenticated account id in the `X-User-Id` header. These extractors
//! load the account and gate admin-only routes.

use axum::extract::FromRequestParts;
use http::request::Parts;
use shared::models::Role;

use crate::core::ServerState;
use crate::db::repository::user;
use crate::utils::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated account behind this request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub role: Role,
}

impl FromRequestParts<ServerState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let id: i64 = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                AppError::unauthorized("Please login first", "يرجى تسجيل الدخول أولاً")
            })?;

        let account = user::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| {
                AppError::unauthorized("Account not found or disabled", "الحساب غير موجود أو معطل")
            })?;

        Ok(CurrentUser {
            id: account.id,
            role: account.role,
        })
    }
}

/// Admin-gated identity for back-office routes
#[derive(Debug, Clone)]
pub struct Admin(pub CurrentUser);

impl FromRequestParts<ServerState> for Admin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServerState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        if !current.role.is_admin() {
            return Err(AppError::forbidden(
                "Admin role required",
                "هذه العملية تتطلب صلاحيات المشرف",
            ));
        }
        Ok(Admin(current))
    }
}
