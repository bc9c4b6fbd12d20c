use crate::error::AppError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::json;

/// Maps an [`AppError`] onto `{success:false, error, timestamp}` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AppError::Decode(_) | AppError::EmptyInput(_) => StatusCode::BAD_REQUEST,
            AppError::CameraBusy => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self.0);
        } else {
            tracing::warn!("Request rejected: {}", self.0);
        }
        let body = json!({
            "success": false,
            "error": self.0.to_string(),
            "timestamp": Utc::now(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_kind() {
        assert_eq!(
            ApiError(AppError::EmptyInput("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError(AppError::Decode("x".into())).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError(AppError::CameraBusy).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError(AppError::Store("x".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
