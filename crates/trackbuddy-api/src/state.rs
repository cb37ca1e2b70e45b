use std::sync::Arc;

use trackbuddy_core::{DayBoundary, Store};

use crate::{auth::JwtManager, config::ApiConfig};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub jwt: Arc<JwtManager>,
    pub days: DayBoundary,
    pub bcrypt_cost: u32,
    pub token_header: String,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &ApiConfig) -> trackbuddy_core::Result<Self> {
        Ok(Self {
            store,
            jwt: Arc::new(JwtManager::new(&config.jwt_secret, config.token_ttl_secs)),
            days: DayBoundary::from_offset_minutes(config.day_offset_minutes)?,
            bcrypt_cost: config.bcrypt_cost,
            token_header: config.token_header.to_ascii_lowercase(),
        })
    }
}
