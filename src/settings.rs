//! Layered runtime configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! `TRIVIA__*` environment variables (`TRIVIA__DATABASE__URL`,
//! `TRIVIA__SERVER__PORT`, ...). A `.env` file is honoured by the binaries
//! before settings are read.

use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "trivia.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Loads settings, reading `path` if given or `trivia.toml` if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::builder()?
            .add_source(file)
            .add_source(Environment::with_prefix("TRIVIA").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.url", "sqlite:trivia.db")?
            .set_default("database.max_connections", 5_i64)
    }
}
