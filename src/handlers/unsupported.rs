use crate::error::ApiError;

/// Any method on the settings route other than GET or POST
///
/// HEAD is routed here explicitly; axum would otherwise answer it with the
/// GET handler.
pub async fn method_not_supported_handler() -> ApiError {
    ApiError::MethodNotSupported
}
