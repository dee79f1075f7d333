//! HTTP API
//!
//! JSON endpoints over the record manager:
//!
//! - `GET /` liveness text
//! - `GET|POST /patient`, `GET|PATCH|DELETE /patient/:id`
//! - `GET|POST /event`, `GET|PATCH|DELETE /event/:id` (`?type=patient` on GET)
//!
//! Every JSON response is an [`Envelope`]. Unknown routes answer with a 404
//! envelope and unsupported methods on known routes with a 405 envelope.
//!
//! # Example
//!
//! ```rust,no_run
//! use exposure::adapters::database::RecordStores;
//! use exposure::api::{router, serve, AppState};
//! use exposure::config::ServerConfig;
//! use exposure::core::records::{RecordManager, RecordPolicy};
//! use tokio::sync::watch;
//!
//! # async fn example() -> exposure::domain::Result<()> {
//! let stores = RecordStores::memory();
//! let manager = RecordManager::new(stores.patients, stores.events, RecordPolicy::default());
//! let app = router(AppState::new(manager), &ServerConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! let (_tx, rx) = watch::channel(false);
//! serve(listener, app, rx).await?;
//! # Ok(())
//! # }
//! ```

pub mod cors;
pub mod envelope;
pub mod error;
pub mod events;
pub mod extract;
pub mod patients;
pub mod state;

pub use cors::OriginPolicy;
pub use envelope::Envelope;
pub use error::{ApiError, ApiResult};
pub use state::AppState;

use crate::config::ServerConfig;
use crate::domain::{ExposureError, Result};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Message of the fallback 404 envelope
pub const ROUTE_NOT_FOUND_MESSAGE: &str = "route not found";

/// Message of the 405 envelope
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "method not allowed";

/// Builds the application router
pub fn router(state: AppState, server: &ServerConfig) -> Router {
    let origins = OriginPolicy::new(&server.allowed_origins);

    Router::new()
        .route("/", get(liveness))
        .route(
            "/patient",
            get(patients::list_patients).post(patients::create_patient),
        )
        .route(
            "/patient/:id",
            get(patients::get_patient)
                .patch(patients::update_patient)
                .delete(patients::delete_patient),
        )
        .route("/event", get(events::list_events).post(events::create_event))
        .route(
            "/event/:id",
            get(events::find_events)
                .patch(events::update_event)
                .delete(events::delete_event),
        )
        .fallback(route_not_found)
        .with_state(state)
        .layer(middleware::map_response(method_not_allowed))
        .layer(origins.layer())
        .layer(middleware::from_fn_with_state(origins, cors::enforce_origin))
}

async fn liveness() -> String {
    format!("server starts at {}", chrono::Utc::now().to_rfc2822())
}

async fn route_not_found() -> Envelope {
    Envelope::failure(StatusCode::NOT_FOUND, ROUTE_NOT_FOUND_MESSAGE)
}

// Routing answers 405 with an empty body; keep its Allow header
async fn method_not_allowed(response: Response) -> Response {
    if response.status() != StatusCode::METHOD_NOT_ALLOWED {
        return response;
    }

    let allow = response.headers().get(header::ALLOW).cloned();
    let mut enveloped =
        Envelope::failure(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
            .into_response();
    if let Some(allow) = allow {
        enveloped.headers_mut().insert(header::ALLOW, allow);
    }
    enveloped
}

/// Serves `app` until `shutdown` turns true
///
/// In-flight requests are allowed to finish after the signal.
pub async fn serve(
    listener: TcpListener,
    app: Router,
    mut shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(address = %addr, "HTTP server listening");

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow() {
                // A dropped sender also ends the server
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
            tracing::info!("Shutdown signal received, draining connections");
        })
        .await
        .map_err(|e| ExposureError::Io(format!("HTTP server failed: {e}")))?;

    tracing::info!("HTTP server stopped");
    Ok(())
}
