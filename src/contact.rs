//! Contact relay: validate a submission, sanitize it, forward it to the
//! email delivery provider. Nothing is retained between calls.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_MESSAGE_LEN: usize = 5_000;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, Deserialize)]
pub struct ContactSubmission {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub message: String,
}

/// One fully rendered outbound message, both body variants included.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub reply_to: String,
    pub text: String,
    pub html: String,
}

/// Seam to the delivery provider so tests can count invocations.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, email: &OutboundEmail) -> Result<()>;
}

/// Structural checks only, rejected before any outbound call. Returns the
/// user-facing reason on failure.
pub fn validate(submission: &ContactSubmission) -> Result<(), &'static str> {
    let name = submission.name.trim();
    let email = submission.email.trim();
    let message = submission.message.trim();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err("All fields are required.");
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err("Name is too long.");
    }
    if message.chars().count() > MAX_MESSAGE_LEN {
        return Err("Message is too long.");
    }
    if !is_plausible_email(email) {
        return Err("Email address is not valid.");
    }
    Ok(())
}

/// Presence of `@`, a dot in the domain, no whitespace. Deliberately not
/// full RFC validation.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.split_once('.').is_some_and(|(host, tld)| {
            !host.is_empty() && !tld.is_empty()
        })
}

/// Render both body variants. The HTML variant entity-encodes user input
/// (`& < > " '`) so it cannot inject markup, and turns message newlines into
/// `<br />`; the plain-text variant keeps raw newlines.
pub fn build_email(
    submission: &ContactSubmission,
    from: &str,
    to: &str,
) -> OutboundEmail {
    let name = submission.name.trim();
    let email = submission.email.trim();
    let message = submission.message.trim();

    let text = format!("Name: {name}\nEmail: {email}\n\nMessage:\n{message}\n");

    let html_name = html_escape::encode_quoted_attribute(name);
    let html_message = html_escape::encode_quoted_attribute(message).replace('\n', "<br />");
    let html = format!(
        "<h2>New message from the portfolio</h2>\
         <p><strong>Name:</strong> {html_name}</p>\
         <p><strong>Email:</strong> {}</p>\
         <hr />\
         <p><strong>Message:</strong></p>\
         <p>{html_message}</p>",
        html_escape::encode_quoted_attribute(email)
    );

    OutboundEmail {
        from: from.to_string(),
        to: to.to_string(),
        subject: format!("New portfolio message from {name}"),
        reply_to: email.to_string(),
        text,
        html,
    }
}

/// Delivery over the provider's HTTP API with a Bearer credential.
pub struct ResendTransport {
    client: reqwest::Client,
    api_key: String,
    timeout: Duration,
}

impl ResendTransport {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            timeout: Duration::from_secs(10),
        }
    }
}

#[async_trait]
impl MailTransport for ResendTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        let resp = self
            .client
            .post(RESEND_ENDPOINT)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .context("resend request failed")?;

        if let Err(e) = resp.error_for_status_ref() {
            // Provider detail stays server-side; callers get a generic error.
            let detail = resp.text().await.unwrap_or_default();
            tracing::error!(error = %e, %detail, "resend rejected the message");
            return Err(anyhow!("delivery provider returned an error"));
        }
        Ok(())
    }
}
