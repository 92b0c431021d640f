//! Layered application configuration.
//!
//! Sources, later wins: built-in defaults, an optional `config.toml`
//! next to the binary, then `NUTRIHUB__`-prefixed environment variables
//! (e.g. `NUTRIHUB__SERVER__PORT=8080`). A `.env` file is loaded first
//! via dotenvy so the env source sees it.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection string, e.g. `sqlite:nutrihub.db`. Wrapped so it never
    /// lands in debug output.
    pub url: SecretString,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl AppConfig {
    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Ok(config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("database.url", "sqlite:nutrihub.db")?)
    }

    pub fn load() -> Result<Self, ConfigError> {
        // Missing .env is normal outside development.
        dotenvy::dotenv().ok();

        let cfg = Self::defaults()?
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("NUTRIHUB").separator("__"))
            .build()?;
        let parsed: AppConfig = cfg.try_deserialize()?;
        tracing::debug!(
            host = %parsed.server.host,
            port = parsed.server.port,
            "configuration loaded"
        );
        Ok(parsed)
    }
}
