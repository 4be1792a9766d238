// src/notify/mailer.rs
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use super::{
    config::SmtpConfig,
    error::{NotifyError, Result},
    otp::{OneTimePassword, OTP_SUBJECT},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_otp(&self, to: &str, otp: &OneTimePassword) -> Result<()>;
}

/// STARTTLS submission with username/password auth.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Config(format!("invalid smtp.from address: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| NotifyError::Config(format!("invalid SMTP relay {}: {}", config.host, e)))?
            .port(config.port)
            .credentials(Credentials::new(config.username.clone(), config.password.clone()))
            .build();

        Ok(Self { transport, from })
    }

    pub fn compose(&self, to: &str, otp: &OneTimePassword) -> Result<Message> {
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Delivery(format!("invalid recipient {}: {}", to, e)))?;

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(OTP_SUBJECT)
            .header(ContentType::TEXT_PLAIN)
            .body(otp.message_body())
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_otp(&self, to: &str, otp: &OneTimePassword) -> Result<()> {
        let message = self.compose(to, otp)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::config::tests::smtp_config;

    #[tokio::test]
    async fn test_compose_builds_plain_text_message() {
        let mailer = SmtpMailer::new(&smtp_config()).unwrap();
        let otp = OneTimePassword::generate();

        let message = mailer.compose("alice@example.com", &otp).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: BioVault OTP"));
        assert!(raw.contains("To: alice@example.com"));
        assert!(raw.contains(&otp.code));
    }

    #[tokio::test]
    async fn test_compose_rejects_bad_recipient() {
        let mailer = SmtpMailer::new(&smtp_config()).unwrap();
        let result = mailer.compose("not-an-address", &OneTimePassword::generate());
        assert!(matches!(result, Err(NotifyError::Delivery(_))));
    }

    #[test]
    fn test_bad_sender_is_config_error() {
        let mut config = smtp_config();
        config.from = "nobody".into();
        assert!(matches!(SmtpMailer::new(&config), Err(NotifyError::Config(_))));
    }
}
