use std::sync::Arc;

use tokio::sync::Mutex;

use ecoe_station::session::Session;

use crate::config::EcoeConfig;

/// Shared application state: the single session behind a mutex plus the
/// resolved AWS configuration for model calls.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    pub sdk_config: aws_config::SdkConfig,
    pub model_id: String,
}

impl AppState {
    pub fn new(sdk_config: aws_config::SdkConfig, config: &EcoeConfig) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new(config.station_minutes))),
            sdk_config,
            model_id: config.model_id.clone(),
        }
    }
}
