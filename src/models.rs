use serde::{Deserialize, Serialize};

/// A shared payload as it is persisted in the record store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRecord {
    pub id: String,
    /// Decoded payload bytes
    pub data: Vec<u8>,
    /// Seconds since the Unix epoch after which the backend may reclaim the record
    pub expiry: i64,
}

/// Request body for creating a shared record
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateSettingsRequest {
    /// Base64 encoded payload (standard alphabet, padded)
    pub settings: Option<String>,
}

/// Response type for successful create operations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CreateSettingsResponse {
    pub id: String,
}

/// Query parameters for the retrieve operation
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RetrieveSettingsQuery {
    /// Key returned by a previous create
    pub settings_key: Option<String>,
}

/// Response type for retrieve operations
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RetrieveSettingsResponse {
    pub found: bool,
    /// Base64 encoded payload, present only when `found` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<String>,
}

impl RetrieveSettingsResponse {
    pub fn found(settings: String) -> Self {
        Self {
            found: true,
            settings: Some(settings),
        }
    }

    pub fn not_found() -> Self {
        Self {
            found: false,
            settings: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_omits_settings() {
        let json = serde_json::to_value(RetrieveSettingsResponse::not_found()).unwrap();
        assert_eq!(json, serde_json::json!({ "found": false }));
    }

    #[test]
    fn test_found_includes_settings() {
        let json = serde_json::to_value(RetrieveSettingsResponse::found("aGVsbG8=".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({ "found": true, "settings": "aGVsbG8=" }));
    }

    #[test]
    fn test_create_request_tolerates_missing_field() {
        let request: CreateSettingsRequest = serde_json::from_str("{}").unwrap();
        assert!(request.settings.is_none());
    }
}
