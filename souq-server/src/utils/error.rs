//! 统一错误处理
//!
//! Application error enum and the bilingual JSON error envelope:
//!
//! ```json
//! {
//!   "status": "error",
//!   "code": "E0003",
//!   "message_en": "Coupon Not Found",
//!   "message_ar": "الكوبون غير موجود"
//! }
//! ```
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | HTTP |
//! |------|------|------|
//! | E0xxx | 业务逻辑错误 | 400/404/424 |
//! | E2xxx | 权限错误 | 403 |
//! | E3xxx | 认证错误 | 401 |
//! | E9xxx | 系统错误 | 500 |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shared::response::ApiResponse;
use tracing::error;

/// Bilingual error envelope body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: String,
    pub code: String,
    pub message_en: String,
    pub message_ar: String,
}

/// 应用错误枚举
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证/权限错误 (401/403) ==========
    #[error("Unauthorized: {en}")]
    Unauthorized { en: String, ar: String },

    #[error("Permission denied: {en}")]
    Forbidden { en: String, ar: String },

    // ========== 业务逻辑错误 (4xx) ==========
    #[error("Resource not found: {en}")]
    NotFound { en: String, ar: String },

    #[error("Validation failed: {en}")]
    Validation { en: String, ar: String },

    #[error("Business rule violation: {en}")]
    BusinessRule { en: String, ar: String },

    /// 外部依赖失败 (424) — payment gateway, shipping provider
    #[error("Dependency failed: {en}")]
    Dependency { en: String, ar: String },

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, en, ar) = match self {
            AppError::Unauthorized { en, ar } => (StatusCode::UNAUTHORIZED, "E3001", en, ar),
            AppError::Forbidden { en, ar } => (StatusCode::FORBIDDEN, "E2001", en, ar),
            AppError::NotFound { en, ar } => (StatusCode::NOT_FOUND, "E0003", en, ar),
            AppError::Validation { en, ar } => (StatusCode::BAD_REQUEST, "E0002", en, ar),
            AppError::BusinessRule { en, ar } => (StatusCode::BAD_REQUEST, "E0005", en, ar),
            AppError::Dependency { en, ar } => (StatusCode::FAILED_DEPENDENCY, "E0007", en, ar),
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9002",
                    "Database error".to_string(),
                    "خطأ في قاعدة البيانات".to_string(),
                )
            }
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error".to_string(),
                    "خطأ داخلي في الخادم".to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            status: "error".to_string(),
            code: code.to_string(),
            message_en: en,
            message_ar: ar,
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::Database(e.to_string())
    }
}

impl From<crate::db::repository::RepoError> for AppError {
    fn from(e: crate::db::repository::RepoError) -> Self {
        use crate::db::repository::RepoError;
        match e {
            RepoError::NotFound(msg) => AppError::not_found(msg, "غير موجود"),
            RepoError::Duplicate(msg) => {
                AppError::business_rule(format!("Already exists: {msg}"), "موجود بالفعل")
            }
            RepoError::Validation(msg) => AppError::validation(msg, "طلب غير صالح"),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::validation(format!("Invalid request: {e}"), "طلب غير صالح")
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn not_found(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self::NotFound {
            en: en.into(),
            ar: ar.into(),
        }
    }

    pub fn validation(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self::Validation {
            en: en.into(),
            ar: ar.into(),
        }
    }

    pub fn business_rule(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self::BusinessRule {
            en: en.into(),
            ar: ar.into(),
        }
    }

    pub fn unauthorized(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self::Unauthorized {
            en: en.into(),
            ar: ar.into(),
        }
    }

    pub fn forbidden(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self::Forbidden {
            en: en.into(),
            ar: ar.into(),
        }
    }

    pub fn dependency(en: impl Into<String>, ar: impl Into<String>) -> Self {
        Self::Dependency {
            en: en.into(),
            ar: ar.into(),
        }
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

// ========== Helper functions ==========

/// Create a successful response with the default messages
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok(data))
}

/// Create a successful response with custom bilingual messages
pub fn ok_with_message<T: Serialize>(
    data: T,
    success_en: impl Into<String>,
    success_ar: impl Into<String>,
) -> Json<ApiResponse<T>> {
    Json(ApiResponse::ok_with_message(data, success_en, success_ar))
}
