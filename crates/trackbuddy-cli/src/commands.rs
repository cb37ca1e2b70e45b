use anyhow::{Context, Result};

use crate::cli::Commands;
use trackbuddy_api::{auth::JwtManager, ApiConfig};
use trackbuddy_db::Database;

pub async fn execute(command: Commands, database_url: Option<String>) -> Result<()> {
    match command {
        Commands::Serve { port } => {
            let mut config = ApiConfig::from_env()?;
            if let Some(port) = port {
                config.port = port;
            }
            if database_url.is_some() {
                config.database_url = database_url;
            }

            trackbuddy_api::run(config).await?;
        }

        Commands::InitDb => {
            let db_url = database_url.context("--database-url or DATABASE_URL is required")?;

            println!("Initializing database...");
            let database = Database::new(&db_url).await?;
            database.init_schema().await?;
            println!("✓ Database schema initialized");
        }

        Commands::Token { user_id } => {
            let config = ApiConfig::from_env()?;
            let jwt = JwtManager::new(&config.jwt_secret, config.token_ttl_secs);
            let token = jwt.issue(user_id)?;

            tracing::info!("Issued token for user {}", user_id);
            println!("{}", token);
        }
    }

    Ok(())
}
