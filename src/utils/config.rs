// src/utils/config.rs
use std::path::PathBuf;

use config::{builder::DefaultState, Config as ConfigLib, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::{
    core::identity::types::DEFAULT_TOLERANCE,
    storage::StorageBackend,
    utils::error::{Result, ServiceError},
};

const ENV_PREFIX: &str = "BIOVAULT";

/// Settings for the face service binary.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub face: FaceConfig,
    pub security: SecurityConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub file_name: String,
    pub db_path: PathBuf,
    pub key_path: PathBuf,
    pub captures_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaceConfig {
    pub tolerance: f64,
    pub landmark_model: Option<PathBuf>,
    pub encoder_model: Option<PathBuf>,
    pub jitters: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    pub level: String,
    pub directory: Option<PathBuf>,
}

/// Defaults, then `config/default` and `config/local`, then `BIOVAULT__*`
/// environment variables (e.g. `BIOVAULT__SMTP__PASSWORD`).
pub(crate) fn layered_builder() -> std::result::Result<ConfigBuilder<DefaultState>, ConfigError> {
    dotenv::dotenv().ok();

    Ok(ConfigLib::builder()
        // Start with default values
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5001)?
        .set_default("storage.backend", "file")?
        .set_default("storage.data_dir", "data")?
        .set_default("storage.file_name", "embeddings.json")?
        .set_default("storage.db_path", "data/biovault")?
        .set_default("storage.key_path", "data/secret.key")?
        .set_default("storage.captures_dir", "captures")?
        .set_default("face.tolerance", DEFAULT_TOLERANCE)?
        .set_default("face.jitters", 1)?
        .set_default("security.allowed_origins", Vec::<String>::new())?
        .set_default("security.max_request_size", 10_485_760)? // 10MB
        .set_default("log.level", "info")?
        .set_default("database.max_connections", 1)?
        .set_default("database.acquire_timeout_secs", 10)?
        .set_default("smtp.port", 587)?
        // Load from config files
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name("config/local").required(false))
        // Override with environment variables
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("security.allowed_origins")
                .try_parsing(true),
        ))
}

impl Config {
    pub fn new() -> Result<Self> {
        let config: Self = layered_builder()?.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServiceError::Config("Invalid port number".into()));
        }
        if self.server.workers == Some(0) {
            return Err(ServiceError::Config("server.workers must be greater than 0".into()));
        }

        if !(self.face.tolerance > 0.0 && self.face.tolerance <= 1.0) {
            return Err(ServiceError::Config(format!(
                "face.tolerance must be in (0, 1], got {}",
                self.face.tolerance
            )));
        }

        if self.storage.file_name.trim().is_empty() {
            return Err(ServiceError::Config("storage.file_name must be set".into()));
        }
        if self.storage.key_path.as_os_str().is_empty() {
            return Err(ServiceError::Config("storage.key_path must be set".into()));
        }

        if self.security.max_request_size == 0 {
            return Err(ServiceError::Config("max_request_size must be greater than 0".into()));
        }

        Ok(())
    }
}

impl From<ConfigError> for ServiceError {
    fn from(error: ConfigError) -> Self {
        ServiceError::Config(error.to_string())
    }
}
