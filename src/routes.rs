use axum::{routing::get, Router};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_doc::ApiDoc;
use crate::error::panic_response;
use crate::handlers;
use crate::state::AppState;

// Route path constants - single source of truth for all API paths

pub const HEALTH: &str = "/health";
pub const SETTINGS: &str = "/";
pub const SWAGGER_UI: &str = "/swagger-ui";
pub const OPENAPI_JSON: &str = "/api-docs/openapi.json";

/// Build the application router around the given state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            SETTINGS,
            get(handlers::retrieve_handler)
                .post(handlers::create_handler)
                .head(handlers::method_not_supported_handler)
                .fallback(handlers::method_not_supported_handler),
        )
        .route(HEALTH, get(handlers::health_handler))
        .merge(SwaggerUi::new(SWAGGER_UI).url(OPENAPI_JSON, ApiDoc::openapi()))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
