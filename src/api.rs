//! HTTP surface: the aggregation endpoint, the contact relay, and health.
//!
//! Both guarded endpoints share the same rate limiter; upstream detail is
//! logged here and never echoed to callers.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics::counter;
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::config::{AppConfig, RateLimitPolicy};
use crate::contact::{self, ContactSubmission, MailTransport};
use crate::ratelimit::{client_ip, RateLimiter};
use crate::videos::{AggregateError, Aggregator};

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub limiter: Arc<RateLimiter>,
    pub mailer: Option<Arc<dyn MailTransport>>,
    pub limits: RateLimitPolicy,
    pub contact_from: String,
    pub contact_to: String,
    pub cache_ttl_secs: u64,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> Self {
        let mailer: Option<Arc<dyn MailTransport>> = config
            .resend_api_key
            .clone()
            .map(|key| Arc::new(contact::ResendTransport::new(key)) as Arc<dyn MailTransport>);

        Self {
            aggregator: Arc::new(Aggregator::from_config(config)),
            limiter: Arc::new(RateLimiter::new()),
            mailer,
            limits: config.limits,
            contact_from: config.contact_from.clone(),
            contact_to: config.contact_to.clone(),
            cache_ttl_secs: config.cache_ttl.as_secs(),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/videos", get(list_videos))
        .route("/contact", post(submit_contact))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Error taxonomy at the HTTP boundary. Messages here are the full
/// caller-visible detail; anything richer goes to the log.
pub enum ApiError {
    RateLimited,
    ConfigurationMissing(&'static str),
    Validation(&'static str),
    Upstream(&'static str),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::ConfigurationMissing(_) | ApiError::Upstream(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::RateLimited => "Too many requests, retry later.",
            ApiError::ConfigurationMissing(msg)
            | ApiError::Validation(msg)
            | ApiError::Upstream(msg) => msg,
        }
    }
}

async fn list_videos(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let ip = client_ip(&headers);
    if !state
        .limiter
        .allow(&ip, state.limits.videos_limit, state.limits.window)
    {
        return error_response(ApiError::RateLimited);
    }

    match state.aggregator.get_videos().await {
        Ok((videos, origin)) => {
            tracing::debug!(count = videos.len(), ?origin, "served video batch");
            let cache_control = format!(
                "public, s-maxage={}, stale-while-revalidate=600",
                state.cache_ttl_secs
            );
            (
                StatusCode::OK,
                [(header::CACHE_CONTROL, cache_control)],
                Json(json!({ "videos": videos })),
            )
                .into_response()
        }
        Err(AggregateError::MissingApiKey) => {
            tracing::error!("video feed requested but no API key is configured");
            error_response(ApiError::ConfigurationMissing(
                "Video feed is not configured.",
            ))
        }
    }
}

async fn submit_contact(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(submission): Json<ContactSubmission>,
) -> Response {
    let ip = client_ip(&headers);
    if !state
        .limiter
        .allow(&ip, state.limits.contact_limit, state.limits.window)
    {
        return contact_error(ApiError::RateLimited);
    }

    if let Err(reason) = contact::validate(&submission) {
        return contact_error(ApiError::Validation(reason));
    }

    let Some(mailer) = &state.mailer else {
        tracing::error!("contact submitted but no delivery credential is configured");
        return contact_error(ApiError::ConfigurationMissing(
            "Message delivery is not configured.",
        ));
    };

    let email = contact::build_email(&submission, &state.contact_from, &state.contact_to);
    match mailer.send(&email).await {
        Ok(()) => {
            counter!("contact_sent_total").increment(1);
            Json(json!({ "success": true })).into_response()
        }
        Err(e) => {
            tracing::error!(error = ?e, "contact delivery failed");
            contact_error(ApiError::Upstream("Failed to send the message."))
        }
    }
}

/// `GET /videos` errors: `{ "error": ... }`.
fn error_response(err: ApiError) -> Response {
    (err.status(), Json(json!({ "error": err.message() }))).into_response()
}

/// `POST /contact` errors: `{ "success": false, "error": ... }`.
fn contact_error(err: ApiError) -> Response {
    (
        err.status(),
        Json(json!({ "success": false, "error": err.message() })),
    )
        .into_response()
}
