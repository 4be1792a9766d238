// src/notify/notifier.rs
use tracing::{info, warn};

use super::{
    error::Result,
    mailer::Mailer,
    otp::OneTimePassword,
    repository::OtpRepository,
};

/// Single-shot OTP issue: record the code, then mail it. Any failure aborts
/// the run; nothing is retried.
pub struct OtpNotifier<R, M> {
    repository: R,
    mailer: M,
}

impl<R: OtpRepository, M: Mailer> OtpNotifier<R, M> {
    pub fn new(repository: R, mailer: M) -> Self {
        Self { repository, mailer }
    }

    pub async fn notify(&self, email: &str) -> Result<OneTimePassword> {
        let otp = OneTimePassword::generate();

        let updated = self.repository.store_otp(email, &otp).await?;
        if updated == 0 {
            warn!("No user row matched {}; the code cannot be redeemed", email);
        }
        info!("OTP updated in DB");

        self.mailer.send_otp(email, &otp).await?;
        info!("Email sent successfully");

        Ok(otp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{
        error::NotifyError,
        mailer::MockMailer,
        otp::OTP_TTL_MINUTES,
        repository::MockOtpRepository,
    };
    use chrono::{Duration, Local};

    #[test_log::test(tokio::test)]
    async fn test_notify_updates_row_then_sends_one_mail() {
        let mut repository = MockOtpRepository::new();
        repository
            .expect_store_otp()
            .withf(|email, otp| email == "alice@example.com" && otp.code.len() == 6)
            .times(1)
            .returning(|_, _| Ok(1));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send_otp()
            .withf(|to, _| to == "alice@example.com")
            .times(1)
            .returning(|_, _| Ok(()));

        let before = Local::now().naive_local();
        let otp = OtpNotifier::new(repository, mailer)
            .notify("alice@example.com")
            .await
            .unwrap();

        assert!(otp.code.parse::<u32>().is_ok());
        let ttl = otp.expires_at - before;
        assert!(ttl >= Duration::minutes(OTP_TTL_MINUTES));
        assert!(ttl < Duration::minutes(OTP_TTL_MINUTES) + Duration::seconds(5));
    }

    #[tokio::test]
    async fn test_database_failure_skips_mail() {
        let mut repository = MockOtpRepository::new();
        repository
            .expect_store_otp()
            .returning(|_, _| Err(NotifyError::Database("connection refused".into())));

        let mut mailer = MockMailer::new();
        mailer.expect_send_otp().times(0);

        let result = OtpNotifier::new(repository, mailer)
            .notify("alice@example.com")
            .await;

        let error = result.unwrap_err();
        assert!(matches!(error, NotifyError::Database(_)));
        assert_eq!(error.to_string(), "DB update failed: connection refused");
    }

    #[tokio::test]
    async fn test_delivery_failure_is_reported() {
        let mut repository = MockOtpRepository::new();
        repository.expect_store_otp().returning(|_, _| Ok(1));

        let mut mailer = MockMailer::new();
        mailer
            .expect_send_otp()
            .times(1)
            .returning(|_, _| Err(NotifyError::Delivery("535 auth failed".into())));

        let result = OtpNotifier::new(repository, mailer)
            .notify("alice@example.com")
            .await;

        assert!(matches!(result, Err(NotifyError::Delivery(_))));
    }

    #[tokio::test]
    async fn test_unknown_email_still_mails() {
        let mut repository = MockOtpRepository::new();
        repository.expect_store_otp().returning(|_, _| Ok(0));

        let mut mailer = MockMailer::new();
        mailer.expect_send_otp().times(1).returning(|_, _| Ok(()));

        let result = OtpNotifier::new(repository, mailer)
            .notify("nobody@example.com")
            .await;

        assert!(result.is_ok());
    }
}
