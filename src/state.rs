use crate::service::SettingsService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub settings: SettingsService,
}
