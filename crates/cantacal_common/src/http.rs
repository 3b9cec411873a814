// --- File: crates/cantacal_common/src/http.rs ---
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{CantacalError, HttpStatusCode};

// Include the client module
pub mod client;

/// Extension trait for CantacalError to convert it to an Axum HTTP response.
pub trait IntoHttpResponse {
    /// Converts the error into an Axum HTTP response.
    fn into_http_response(self) -> Response;
}

impl IntoHttpResponse for CantacalError {
    fn into_http_response(self) -> Response {
        let status_code =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Calendar clients only need the status; do not tell them which part failed.
        if status_code == StatusCode::UNAUTHORIZED {
            return status_code.into_response();
        }

        let body = Json(json!({
            "error": {
                "message": self.to_string(),
                "code": status_code.as_u16(),
            }
        }));

        (status_code, body).into_response()
    }
}

/// Implement IntoResponse for CantacalError to make it easier to use in Axum handlers.
impl IntoResponse for CantacalError {
    fn into_response(self) -> Response {
        self.into_http_response()
    }
}
