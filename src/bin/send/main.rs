#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::missing_crate_level_docs
)]

//! Direct mail submission tool
//!
//! Sends one message to each recipient over its own authenticated relay
//! session and prints a per-recipient summary. A rejected credential or an
//! unreachable relay aborts the remaining batch; any other failure only
//! affects its own recipient.

use std::{env, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mail_dispatch::{
    domain::{
        communication::email_address::EmailAddress,
        dispatch::{
            content::{self, ContentSpec, DEFAULT_TEXT_BODY},
            pipeline::{DeliveryPipeline, FailurePolicy},
            request::{DeliveryRequest, DEFAULT_SUBJECT},
        },
    },
    infrastructure::{
        email::{
            credentials,
            smtp::{SmtpConfig, SmtpMailer},
        },
        markdown,
    },
};

/// Command-line arguments / environment variables
#[derive(Debug, Parser)]
#[command(about = "Send a message to each recipient over an authenticated relay session")]
pub struct Args {
    /// Recipient addresses, comma separated
    #[arg(short = 't', long)]
    pub to: String,

    /// The message subject
    #[arg(short, long, default_value = DEFAULT_SUBJECT)]
    pub subject: String,

    /// The plain text body
    #[arg(short, long, default_value = DEFAULT_TEXT_BODY)]
    pub message: String,

    /// The HTML body
    #[arg(long)]
    pub html: Option<String>,

    /// Path of a Markdown file to render as the HTML body
    #[arg(long = "md")]
    pub markdown: Option<PathBuf>,

    /// The sender address
    #[arg(long = "from", env = "EMAIL_SENDER", default_value = "noreply@example.com")]
    pub sender: String,

    /// The transport secret (EMAIL_PASS and an interactive prompt are the fallbacks)
    #[arg(long)]
    pub auth: Option<String>,

    /// Attachment file paths, comma separated
    #[arg(short = 'f', long = "files")]
    pub files: Option<String>,

    /// The SMTP relay configuration
    #[clap(flatten)]
    pub smtp: SmtpConfig,
}

#[mutants::skip]
#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let sender = EmailAddress::new(&args.sender).context("invalid sender address")?;

    let attachments: Vec<PathBuf> = args
        .files
        .as_deref()
        .map(split_list)
        .unwrap_or_default()
        .into_iter()
        .map(PathBuf::from)
        .collect();

    let request = DeliveryRequest::new(
        sender.clone(),
        split_list(&args.to),
        Some(args.subject),
        attachments,
    )?;

    let password = credentials::resolve_secret(env::var("EMAIL_PASS").ok(), args.auth, || {
        rpassword::prompt_password(format!("Authorization code for '{sender}': "))
    })?;

    let content = content::resolve(
        &ContentSpec {
            text: Some(args.message),
            html: args.html,
            markdown_file: args.markdown,
        },
        markdown::render,
    )?;

    let mailer = SmtpMailer::new(args.smtp, sender.as_str(), &password);
    let pipeline = DeliveryPipeline::new(mailer, FailurePolicy::AbortOnSessionFault);

    let report = pipeline.deliver(&request, &content).await;

    for outcome in report.outcomes() {
        match outcome.reason() {
            None => println!("Sent to {}", outcome.recipient()),
            Some(reason) => println!("Failed to send to {}: {reason}", outcome.recipient()),
        }
    }

    if let Some(fault) = report.fault() {
        bail!("batch aborted: {fault}");
    }

    println!();
    println!(
        "{}/{} delivered.",
        report.succeeded(),
        request.recipients().len()
    );

    Ok(())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty_entries() {
        assert_eq!(
            split_list(" a@x.com, ,b@y.com,"),
            ["a@x.com", "b@y.com"]
        );
    }

    #[test]
    fn test_split_list_of_empty_string_is_empty() {
        assert!(split_list("").is_empty());
    }
}
