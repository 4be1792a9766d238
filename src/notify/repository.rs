// src/notify/repository.rs
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::debug;

use super::{config::DatabaseConfig, error::Result, otp::OneTimePassword};

const UPDATE_OTP_SQL: &str = "UPDATE users SET otp = $1, otp_expiry = $2 WHERE email = $3";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OtpRepository: Send + Sync {
    /// Writes the code onto the user row for `email`; returns rows touched.
    async fn store_otp(&self, email: &str, otp: &OneTimePassword) -> Result<u64>;
}

pub struct PgOtpRepository {
    pool: PgPool,
}

impl PgOtpRepository {
    /// Connects eagerly so a bad URL or unreachable server fails up front.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.url)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl OtpRepository for PgOtpRepository {
    async fn store_otp(&self, email: &str, otp: &OneTimePassword) -> Result<u64> {
        let result = sqlx::query(UPDATE_OTP_SQL)
            .bind(&otp.code)
            .bind(otp.expires_at)
            .bind(email)
            .execute(&self.pool)
            .await?;

        debug!("OTP update touched {} row(s)", result.rows_affected());
        Ok(result.rows_affected())
    }
}
