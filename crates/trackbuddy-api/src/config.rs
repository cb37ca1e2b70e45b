use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Server settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    /// In-memory store when unset.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub token_ttl_secs: i64,
    pub token_header: String,
    pub bcrypt_cost: u32,
    /// Offset from UTC at which calendar days start.
    pub day_offset_minutes: i32,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("port", 5000)?
            .set_default("token_ttl_secs", 86400)?
            .set_default("token_header", "trackbuddy-token")?
            .set_default("bcrypt_cost", 10)?
            .set_default("day_offset_minutes", 0)?
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    /// Defaults with an explicit secret and no database.
    pub fn with_secret(jwt_secret: impl Into<String>) -> Self {
        Self {
            port: 5000,
            database_url: None,
            jwt_secret: jwt_secret.into(),
            token_ttl_secs: 86400,
            token_header: "trackbuddy-token".to_string(),
            bcrypt_cost: 10,
            day_offset_minutes: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_secret_defaults() {
        let config = ApiConfig::with_secret("s3cret");

        assert_eq!(config.port, 5000);
        assert_eq!(config.token_ttl_secs, 86400);
        assert_eq!(config.token_header, "trackbuddy-token");
        assert!(config.database_url.is_none());
    }
}
