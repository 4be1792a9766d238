// src/notify/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("DB update failed: {0}")]
    Database(String),

    #[error("Failed to send email: {0}")]
    Delivery(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;

impl From<sqlx::Error> for NotifyError {
    fn from(error: sqlx::Error) -> Self {
        NotifyError::Database(error.to_string())
    }
}

impl From<config::ConfigError> for NotifyError {
    fn from(error: config::ConfigError) -> Self {
        NotifyError::Config(error.to_string())
    }
}
