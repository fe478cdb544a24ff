//! Configuration management

use anyhow::{Context, Result};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// NATS server URL
    pub nats_url: String,

    /// PostgreSQL connection string
    pub database_url: String,

    /// Directory where the gateway stages uploaded CSV files
    pub upload_dir: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let nats_url = std::env::var("NATS_URL")
            .unwrap_or_else(|_| "nats://localhost:4222".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set")?;

        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads/csv".to_string());

        Ok(Self {
            nats_url,
            database_url,
            upload_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_upload_dir_uses_env_when_set() {
        std::env::set_var("UPLOAD_DIR", "/tmp/messhall-uploads");
        std::env::set_var("DATABASE_URL", "postgres://test");

        let config = Config::from_env().unwrap();
        assert_eq!(config.upload_dir, "/tmp/messhall-uploads");

        // Cleanup
        std::env::remove_var("UPLOAD_DIR");
    }

    #[test]
    #[ignore] // requires --test-threads=1 due to env var race
    fn test_config_upload_dir_defaults() {
        std::env::remove_var("UPLOAD_DIR");
        std::env::set_var("DATABASE_URL", "postgres://test");

        let config = Config::from_env().unwrap();
        assert_eq!(config.upload_dir, "uploads/csv");
    }
}
