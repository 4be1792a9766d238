// src/notify/config.rs
use serde::Deserialize;

use super::error::{NotifyError, Result};
use crate::utils::config::{layered_builder, LogConfig};

/// Settings for the OTP notifier. Credentials come from config files or
/// `BIOVAULT__DATABASE__URL` / `BIOVAULT__SMTP__*`, never from code.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    pub log: LogConfig,
    pub database: DatabaseConfig,
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    /// How long to wait for a connection before giving up
    pub acquire_timeout_secs: u64,
}

#[derive(Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl std::fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

impl NotifierConfig {
    pub fn new() -> Result<Self> {
        let config: Self = layered_builder()?.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            return Err(NotifyError::Config("database.url must be set".into()));
        }
        if self.database.max_connections == 0 {
            return Err(NotifyError::Config("database.max_connections must be greater than 0".into()));
        }
        if self.database.acquire_timeout_secs == 0 {
            return Err(NotifyError::Config("database.acquire_timeout_secs must be greater than 0".into()));
        }

        let smtp = &self.smtp;
        if smtp.host.trim().is_empty() || smtp.port == 0 {
            return Err(NotifyError::Config("smtp.host and smtp.port must be set".into()));
        }
        if smtp.username.is_empty() || smtp.password.is_empty() {
            return Err(NotifyError::Config("smtp.username and smtp.password must be set".into()));
        }
        if smtp.from.trim().is_empty() {
            return Err(NotifyError::Config("smtp.from must be set".into()));
        }

        Ok(())
    }
}
