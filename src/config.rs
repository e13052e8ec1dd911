use std::env;
use thiserror::Error;

pub const DEFAULT_MONGO_URL: &str = "mongodb://localhost/api-server";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PORT '{0}': expected a number between 0 and 65535")]
    InvalidPort(String),
}

/// Process configuration, read from the environment (and `.env`).
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongo_url: String,
    /// From `NODE_ENV`, else `APP_ENV`; `development` turns on per-request access logging
    pub environment: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 3000,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            mongo_url: lookup("MONGO_URL").unwrap_or_else(|| DEFAULT_MONGO_URL.to_string()),
            environment: lookup("NODE_ENV")
                .or_else(|| lookup("APP_ENV"))
                .unwrap_or_else(|| "production".to_string()),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}
