//! Shared response envelope for API handlers.
//!
//! Successful responses are `{ "success": true, "data": ... }`; errors are
//! rendered by [`AppError`](crate::error::AppError) with `success: false`.

use serde::Serialize;

/// Standard `{ "success": true, "data": T }` envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::new(application)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
