// tests/contact_relay.rs
//
// Relay contract: exactly one delivery call per valid submission, zero calls
// for anything that fails validation, and no markup injection in the HTML
// body.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;
use portfolio_api::contact::{
    build_email, validate, ContactSubmission, MailTransport, OutboundEmail, MAX_NAME_LEN,
};

#[derive(Default)]
struct RecordingTransport {
    calls: AtomicUsize,
    last: Mutex<Option<OutboundEmail>>,
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn send(&self, email: &OutboundEmail) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock().unwrap() = Some(email.clone());
        Ok(())
    }
}

fn submission(name: &str, email: &str, message: &str) -> ContactSubmission {
    ContactSubmission {
        name: name.into(),
        email: email.into(),
        message: message.into(),
    }
}

/// Drive the same validate → build → send sequence the handler runs.
async fn relay(
    transport: &RecordingTransport,
    s: &ContactSubmission,
) -> Result<(), &'static str> {
    validate(s)?;
    let email = build_email(s, "Portfolio <contact@example.com>", "inbox@example.com");
    transport.send(&email).await.map_err(|_| "delivery failed")
}

#[tokio::test]
async fn valid_submission_invokes_delivery_exactly_once() {
    let transport = RecordingTransport::default();
    let s = submission("Ana", "ana@example.com", "Bonjour!\nJ'aime votre travail.");

    relay(&transport, &s).await.expect("relay succeeds");
    assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

    let sent = transport.last.lock().unwrap().clone().expect("captured");
    assert_eq!(sent.reply_to, "ana@example.com");
    assert_eq!(sent.to, "inbox@example.com");
    assert_eq!(sent.from, "Portfolio <contact@example.com>");
    assert_eq!(sent.subject, "New portfolio message from Ana");
}

#[tokio::test]
async fn invalid_submissions_never_reach_the_provider() {
    let transport = RecordingTransport::default();

    let cases = vec![
        submission("", "a@b.com", "hi"),
        submission("Ana", "", "hi"),
        submission("Ana", "a@b.com", ""),
        submission("Ana", "not-an-email", "hi"),
        submission("Ana", "spaced @b.com", "hi"),
        submission(&"x".repeat(MAX_NAME_LEN + 1), "a@b.com", "hi"),
        submission("Ana", "a@b.com", &"y".repeat(5_001)),
    ];

    for s in &cases {
        assert!(relay(&transport, s).await.is_err());
    }
    assert_eq!(
        transport.calls.load(Ordering::SeqCst),
        0,
        "zero external calls for rejected submissions"
    );
}

#[tokio::test]
async fn name_of_101_chars_is_rejected_with_max_100() {
    let transport = RecordingTransport::default();
    let s = submission(&"n".repeat(101), "a@b.com", "hello");
    assert_eq!(relay(&transport, &s).await, Err("Name is too long."));
    assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn html_body_never_contains_raw_user_markup() {
    let transport = RecordingTransport::default();
    let s = submission(
        "<img src=x onerror=alert(1)>",
        "xss@example.com",
        "click \"here\" & 'there' <a href=\"http://evil\">now</a>",
    );

    relay(&transport, &s).await.expect("relay succeeds");
    let sent = transport.last.lock().unwrap().clone().expect("captured");

    assert!(!sent.html.contains("<img"));
    assert!(!sent.html.contains("<a href"));
    assert!(sent.html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    assert!(sent.html.contains("&quot;here&quot; &amp; &#x27;there&#x27;"));
}
