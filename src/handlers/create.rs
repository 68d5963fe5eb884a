use crate::error::{ApiError, ErrorResponse};
use crate::models::{CreateSettingsRequest, CreateSettingsResponse};
use crate::routes;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, http::StatusCode, Json};

/// POST / handler - Share a base64 payload
///
/// The body is parsed as JSON whatever its content type.
#[utoipa::path(
    post,
    path = routes::SETTINGS,
    request_body = CreateSettingsRequest,
    responses(
        (status = 200, description = "Payload stored", body = CreateSettingsResponse),
        (status = 400, description = "Missing settings, invalid base64 or malformed body", body = ErrorResponse),
        (status = 500, description = "Record store failure", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn create_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateSettingsResponse>), ApiError> {
    let value: serde_json::Value = serde_json::from_slice(&body)?;
    if !value.is_object() {
        return Err(ApiError::InvalidInput("request body must be a JSON object".to_string()));
    }
    let request: CreateSettingsRequest = serde_json::from_value(value)?;

    let id = state.settings.create(request.settings.as_deref()).await?;

    Ok((StatusCode::OK, Json(CreateSettingsResponse { id })))
}
