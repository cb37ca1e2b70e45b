pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use std::sync::Arc;

use anyhow::Result;
use trackbuddy_core::{MemoryStore, Store};

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;

/// Open the configured store: PostgreSQL when a database URL is set, memory otherwise.
pub async fn open_store(config: &ApiConfig) -> Result<Arc<dyn Store>> {
    match config.database_url.as_deref() {
        Some(db_url) => {
            let database = trackbuddy_db::Database::new(db_url).await?;
            database.init_schema().await?;
            Ok(Arc::new(database))
        }
        None => {
            tracing::warn!("No DATABASE_URL provided, running without persistence");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Serve the API until the listener fails.
pub async fn run(config: ApiConfig) -> Result<()> {
    let store = open_store(&config).await?;
    let state = AppState::new(store, &config)?;
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("TrackBuddy API Server running on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
