//! HTTP mapping of domain errors

use super::envelope::Envelope;
use crate::domain::ExposureError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Handler result
pub type ApiResult = std::result::Result<Envelope, ApiError>;

/// Error rendered as a failure envelope
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Maps a domain error, reporting storage failures with `storage_status`
    ///
    /// Most endpoints answer storage failures with 500; a few answer 400.
    pub fn from_domain(err: ExposureError, storage_status: StatusCode) -> Self {
        let status = match &err {
            err if err.is_client_error() => StatusCode::BAD_REQUEST,
            ExposureError::NotFound(_) => StatusCode::NOT_FOUND,
            ExposureError::Storage(_) => storage_status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            crate::log_error_with_context!(&err, "Request failed");
        } else {
            tracing::warn!(kind = err.kind(), status = status.as_u16(), error = %err, "Request rejected");
        }

        Self::new(status, err.to_string())
    }

    /// Mapping for endpoints that report storage failures as 400
    pub fn storage_as_bad_request(err: ExposureError) -> Self {
        Self::from_domain(err, StatusCode::BAD_REQUEST)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ExposureError> for ApiError {
    fn from(err: ExposureError) -> Self {
        Self::from_domain(err, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Envelope::failure(self.status, self.message).into_response()
    }
}
