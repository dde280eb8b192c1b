#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Webhook server accepting mail delivery requests

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use mail_dispatch::{
    domain::communication::email_address::EmailAddress,
    infrastructure::{
        email::smtp::{SmtpConfig, SmtpMailer},
        http::{
            state::{AppConfig, AppState},
            HttpServer, HttpServerConfig,
        },
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
pub struct Args {
    /// The HTTP server configuration
    #[clap(flatten)]
    pub server: HttpServerConfig,

    /// The SMTP relay configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,

    /// The sender address applied to every outgoing message
    #[clap(long, env = "EMAIL_SENDER", default_value = "noreply@example.com")]
    pub sender: String,

    /// The transport secret used to authenticate against the relay
    #[clap(long, env = "EMAIL_PASS", hide_env_values = true)]
    pub email_pass: Option<String>,

    /// The access credential required from callers
    #[clap(long, env = "API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Log verbosity
    #[clap(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&args.log_level).context("invalid log level")?)
        .init();

    let sender = EmailAddress::new(&args.sender).context("invalid sender address")?;

    if args.email_pass.is_none() {
        warn!("EMAIL_PASS is not set; every delivery request will be rejected");
    }

    let mailer = args
        .email_pass
        .as_deref()
        .map(|password| SmtpMailer::new(args.smtp.clone(), sender.as_str(), password));

    let state = AppState::new(
        AppConfig {
            sender,
            api_key: args.api_key.clone(),
        },
        mailer,
    );

    HttpServer::new(state, &args.server).await?.run().await
}
