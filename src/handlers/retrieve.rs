use crate::error::{ApiError, ErrorResponse};
use crate::models::{RetrieveSettingsQuery, RetrieveSettingsResponse};
use crate::routes;
use crate::service::Retrieved;
use crate::state::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    Json,
};

/// GET / handler - Fetch a shared payload by key
///
/// An unknown or expired key is a successful lookup with `found: false`.
#[utoipa::path(
    get,
    path = routes::SETTINGS,
    params(RetrieveSettingsQuery),
    responses(
        (status = 200, description = "Lookup completed", body = RetrieveSettingsResponse),
        (status = 400, description = "Missing or blank settingsKey, or key rejected by the store", body = ErrorResponse),
        (status = 500, description = "Record store failure", body = ErrorResponse)
    ),
    tag = "settings"
)]
pub async fn retrieve_handler(
    State(state): State<AppState>,
    query: Result<Query<RetrieveSettingsQuery>, QueryRejection>,
) -> Result<(StatusCode, Json<RetrieveSettingsResponse>), ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let response = match state.settings.retrieve(query.settings_key.as_deref()).await? {
        Retrieved::Found(settings) => RetrieveSettingsResponse::found(settings),
        Retrieved::NotFound => RetrieveSettingsResponse::not_found(),
    };

    Ok((StatusCode::OK, Json(response)))
}
