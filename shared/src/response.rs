//! API Response types
//!
//! Standardized bilingual (en/ar) response structures for the entire backend.

use serde::{Deserialize, Serialize};

/// Status value carried by every successful response
pub const STATUS_SUCCESS: &str = "success";

/// Unified API success envelope
///
/// All successful responses follow this format:
/// ```json
/// {
///     "status": "success",
///     "data": { ... },
///     "success_en": "created successfully",
///     "success_ar": "تم الانشاء بنجاح"
/// }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `"success"`; errors use their own envelope
    pub status: String,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// English success message
    pub success_en: String,
    /// Arabic success message
    pub success_ar: String,
}

impl<T> ApiResponse<T> {
    /// Create a successful response with the default "done" messages
    pub fn ok(data: T) -> Self {
        Self::ok_with_message(data, "done successfully", "تمت العملية بنجاح")
    }

    /// Create a successful response with custom bilingual messages
    pub fn ok_with_message(
        data: T,
        success_en: impl Into<String>,
        success_ar: impl Into<String>,
    ) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data: Some(data),
            success_en: success_en.into(),
            success_ar: success_ar.into(),
        }
    }
}

/// Pagination metadata
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
    /// Total number of items
    pub total: u64,
    /// Total number of pages
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let total_pages = if per_page == 0 {
            0
        } else {
            ((total as f64) / (per_page as f64)).ceil() as u32
        };
        Self {
            page,
            per_page,
            total,
            total_pages,
        }
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    /// List of items
    pub items: Vec<T>,
    /// Pagination metadata
    pub pagination: Pagination,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            items,
            pagination: Pagination::new(page, per_page, total),
        }
    }
}
