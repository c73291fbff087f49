//! Result alias for handler and service code

use crate::utils::AppError;

pub type AppResult<T> = Result<T, AppError>;
