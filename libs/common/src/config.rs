//! HTTP server settings loaded from prefixed environment variables

use anyhow::Result;
use ::config::{Config, Environment};
use serde::Deserialize;

/// Address an HTTP service binds to
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load `<PREFIX>_HOST` and `<PREFIX>_PORT`, falling back to
    /// `0.0.0.0` and `default_port`
    pub fn from_env(prefix: &str, default_port: u16) -> Result<Self> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
