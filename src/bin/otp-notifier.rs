use std::process::ExitCode;

use biovault::{
    notify::{NotifierConfig, NotifyError, OneTimePassword, OtpNotifier, PgOtpRepository, SmtpMailer},
    utils::logging,
};
use clap::Parser;
use tracing::error;

/// Generate a BioVault login OTP, record it for the user and email it.
#[derive(Debug, Parser)]
#[command(name = "otp-notifier", version)]
struct Cli {
    /// Email address of an existing BioVault user
    email: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Usage errors exit 1 like every other failure; --help/--version exit 0
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(&cli.email).await {
        Ok(otp) => {
            println!("OTP {} generated and sent to {}", otp.code, cli.email);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(email: &str) -> Result<OneTimePassword, NotifyError> {
    let config = NotifierConfig::new()?;
    let _guard = logging::init_tracing(&config.log, "otp-notifier.log");

    let repository = PgOtpRepository::connect(&config.database).await?;
    let mailer = SmtpMailer::new(&config.smtp)?;

    OtpNotifier::new(repository, mailer)
        .notify(email)
        .await
        .map_err(|e| {
            error!("OTP run aborted: {}", e);
            e
        })
}
