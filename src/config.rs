use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub database_url: String,

    // Rate limiting, 0 disables the limiter
    pub rate_api_per_min: u32,

    pub log_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_addr: "127.0.0.1:8000".to_string(),
            database_url: "sqlite://hrms_lite.db?mode=rwc".to_string(),
            rate_api_per_min: 1000,
            log_dir: "logs".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            rate_api_per_min: match env::var("RATE_API_PER_MIN") {
                Ok(raw) => raw
                    .parse()
                    .with_context(|| format!("RATE_API_PER_MIN must be a number, got {raw:?}"))?,
                Err(_) => defaults.rate_api_per_min,
            },
            log_dir: env::var("LOG_DIR").unwrap_or(defaults.log_dir),
        })
    }
}
