use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Uniform error body: `{"status": "fail" | "error", "message": "..."}`
///
/// Client errors (4xx) carry `fail`, server-side failures (5xx) carry `error`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "fail")]
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        let status = if status.is_server_error() {
            "error"
        } else {
            "fail"
        };

        Self {
            status: status.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status_word() {
        let fail = ErrorResponse::new(StatusCode::BAD_REQUEST, "No files were uploaded.");
        assert_eq!(fail.status, "fail");
        assert_eq!(fail.message, "No files were uploaded.");

        let error = ErrorResponse::new(StatusCode::BAD_GATEWAY, "Cannot upload attachment");
        assert_eq!(error.status, "error");
    }

    #[test]
    fn test_error_response_serializes_two_fields() {
        let body = serde_json::to_value(ErrorResponse::new(StatusCode::NOT_FOUND, "No file key."))
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "status": "fail", "message": "No file key." })
        );
    }
}
