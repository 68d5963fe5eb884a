use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::service::ServiceError;

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Error type for the settings endpoints
///
/// Client errors carry a message that is safe to echo back. Server errors
/// keep their cause for the log only; callers get a fixed message.
#[derive(Debug)]
pub enum ApiError {
    /// Missing, malformed or otherwise unusable request input
    InvalidInput(String),
    /// The record store failed for a reason the caller did not cause
    StoreUnavailable(anyhow::Error),
    /// HTTP method other than POST or GET
    MethodNotSupported,
    /// Anything unanticipated
    Internal(String),
}

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::InvalidInput(msg) => {
                tracing::warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, format!("Invalid input: {}", msg))
            }
            ApiError::StoreUnavailable(err) => {
                tracing::error!("Record store failure: {:#}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
            ApiError::MethodNotSupported => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not supported".to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!("Unhandled error: {}", detail);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE.to_string())
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            ServiceError::StoreUnavailable(source) => ApiError::StoreUnavailable(source.into()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidInput(format!("JSON parse error: {}", err))
    }
}

/// Turn a handler panic into the generic server error
pub fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StoreError;

    async fn body_of(response: Response) -> ErrorResponse {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_is_bad_request() {
        let response = ApiError::InvalidInput("settings is required".to_string()).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_of(response).await.error.contains("settings is required"));
    }

    #[tokio::test]
    async fn test_store_failure_does_not_leak_detail() {
        let err: ApiError = ServiceError::StoreUnavailable(StoreError::Unavailable(
            anyhow::anyhow!("secret connection string"),
        ))
        .into();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_of(response).await;
        assert_eq!(body.error, INTERNAL_ERROR_MESSAGE);
        assert!(!body.error.contains("secret"));
    }

    #[tokio::test]
    async fn test_method_not_supported() {
        let response = ApiError::MethodNotSupported.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_panic_response_is_generic() {
        let response = panic_response(Box::new("boom"));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_of(response).await.error, INTERNAL_ERROR_MESSAGE);
    }
}
