//! The response envelope shared by every JSON endpoint.
//!
//! Successful responses look like `{ "status": true, "message": ..., "data": ... }`;
//! `data` is omitted when there is nothing to return. Errors use the same
//! shape with `"status": false` (see [`crate::error::AppError`]).

use serde::Serialize;

/// Standard `{ status, message, data? }` response envelope.
///
/// ```ignore
/// Ok(Json(ApiResponse::ok("Books retrieved", books)))
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// A successful response carrying `data`.
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self::with_status(true, message, data)
    }

    /// A response whose outcome is decided by the caller, e.g. a payment
    /// callback reporting a declined payment.
    pub fn with_status(status: bool, message: impl Into<String>, data: T) -> Self {
        Self {
            status,
            message: message.into(),
            data: Some(data),
        }
    }
}

/// A successful response with a message only.
pub type MessageResponse = ApiResponse<()>;

impl MessageResponse {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: true,
            message: message.into(),
            data: None,
        }
    }
}
