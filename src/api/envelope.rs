//! Response envelope shared by every JSON endpoint

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message carried by every successful response
pub const SUCCESS_MESSAGE: &str = "success";

/// `{ status, message, data }` body
///
/// `status` always equals the HTTP status code of the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub status: u16,
    pub message: String,
    pub data: Option<Value>,
}

impl Envelope {
    pub fn success(status: StatusCode, data: Value) -> Self {
        Self {
            status: status.as_u16(),
            message: SUCCESS_MESSAGE.to_string(),
            data: Some(data),
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: status.as_u16(),
            message: message.into(),
            data: None,
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_envelope_shape() {
        let envelope = Envelope::success(StatusCode::CREATED, json!({"patient": {"age": 3}}));
        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({"status": 201, "message": "success", "data": {"patient": {"age": 3}}})
        );
    }

    #[test]
    fn test_failure_envelope_has_null_data() {
        let value =
            serde_json::to_value(Envelope::failure(StatusCode::NOT_FOUND, "route not found"))
                .unwrap();
        assert_eq!(
            value,
            json!({"status": 404, "message": "route not found", "data": null})
        );
    }

    #[test]
    fn test_into_response_uses_envelope_status() {
        let response = Envelope::failure(StatusCode::FORBIDDEN, "Not allowed by CORS").into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
