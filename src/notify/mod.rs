// src/notify/mod.rs
//! One-shot OTP issue for BioVault logins, independent of the face service.

pub mod config;
pub mod error;
pub mod mailer;
pub mod notifier;
pub mod otp;
pub mod repository;

pub use config::NotifierConfig;
pub use error::NotifyError;
pub use mailer::{Mailer, SmtpMailer};
pub use notifier::OtpNotifier;
pub use otp::OneTimePassword;
pub use repository::{OtpRepository, PgOtpRepository};
