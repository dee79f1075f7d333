//! Cross-origin policy
//!
//! Browsers calling from an origin outside `server.allowed_origins` are turned
//! away with a 403 envelope before any handler runs. Requests without an
//! `Origin` header (server-to-server, curl) always pass.

use super::envelope::Envelope;
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Message of the 403 envelope
pub const CORS_REJECTION_MESSAGE: &str = "Not allowed by CORS";

/// Origins allowed to call the API
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Arc<Vec<HeaderValue>>,
}

impl OriginPolicy {
    pub fn new(origins: &[String]) -> Self {
        let allowed = origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(origin = %origin, error = %e, "Ignoring unusable allowed origin");
                    None
                }
            })
            .collect();
        Self {
            allowed: Arc::new(allowed),
        }
    }

    /// True when the request carries no origin or an allowed one
    pub fn permits(&self, origin: Option<&HeaderValue>) -> bool {
        match origin {
            None => true,
            Some(origin) => self.allowed.iter().any(|allowed| allowed == origin),
        }
    }

    /// CORS response headers and preflight handling for allowed origins
    pub fn layer(&self) -> CorsLayer {
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(self.allowed.iter().cloned()))
            .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
            .allow_headers([CONTENT_TYPE])
    }
}

/// Middleware rejecting requests from origins outside the policy
pub async fn enforce_origin(
    State(policy): State<OriginPolicy>,
    request: Request,
    next: Next,
) -> Response {
    let origin = request.headers().get(ORIGIN);
    if !policy.permits(origin) {
        tracing::warn!(
            origin = ?origin,
            method = %request.method(),
            path = %request.uri().path(),
            "Request rejected by origin policy"
        );
        return Envelope::failure(StatusCode::FORBIDDEN, CORS_REJECTION_MESSAGE).into_response();
    }

    next.run(request).await
}
