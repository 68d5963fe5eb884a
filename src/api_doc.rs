use utoipa::OpenApi;

use crate::error::{ErrorResponse, HealthResponse, UnhealthyResponse};
use crate::handlers;
use crate::models::{CreateSettingsRequest, CreateSettingsResponse, RetrieveSettingsResponse};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "settings-share API",
        version = "1.0.0",
        description = "Anonymous, expiring sharing of base64 payloads"
    ),
    paths(
        handlers::health::health_handler,
        handlers::create::create_handler,
        handlers::retrieve::retrieve_handler
    ),
    components(
        schemas(
            CreateSettingsRequest,
            CreateSettingsResponse,
            RetrieveSettingsResponse,
            ErrorResponse,
            HealthResponse,
            UnhealthyResponse
        )
    ),
    tags(
        (name = "health", description = "Health check operations"),
        (name = "settings", description = "Share and fetch settings payloads")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_settings_route() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/").expect("settings route documented");

        assert!(item.get.is_some());
        assert!(item.post.is_some());
        assert!(doc.paths.paths.contains_key("/health"));
    }
}
