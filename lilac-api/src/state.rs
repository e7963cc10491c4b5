use std::sync::Arc;

use lilac_onboard::BackfillWorkflow;

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
}

#[derive(Clone)]
pub struct AppState {
    pub backfill: Arc<BackfillWorkflow>,
    pub auth: AuthConfig,
}
