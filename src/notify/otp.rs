// src/notify/otp.rs
use chrono::{Duration, Local, NaiveDateTime};
use rand::Rng;

pub const OTP_TTL_MINUTES: i64 = 5;
pub const OTP_SUBJECT: &str = "BioVault OTP";

/// A 6-digit login code and the local time it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimePassword {
    pub code: String,
    pub expires_at: NaiveDateTime,
}

impl OneTimePassword {
    pub fn generate() -> Self {
        Self::generate_at(Local::now().naive_local())
    }

    pub fn generate_at(now: NaiveDateTime) -> Self {
        let code = rand::thread_rng().gen_range(100_000..=999_999u32).to_string();

        Self {
            code,
            expires_at: now + Duration::minutes(OTP_TTL_MINUTES),
        }
    }

    pub fn message_body(&self) -> String {
        format!(
            "Your OTP for BioVault login is: {}. It expires in {} minutes.",
            self.code, OTP_TTL_MINUTES
        )
    }
}
