//! Request extractors whose rejections are failure envelopes

use super::error::ApiError;
use crate::domain::ids::INVALID_ID_MESSAGE;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::{async_trait, Json};
use serde::Deserialize;
use serde_json::Value;

/// JSON request body
#[derive(Debug)]
pub struct JsonBody(pub Value);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// Raw `:id` path segment
///
/// Segments that do not percent-decode to UTF-8 are answered like any other
/// malformed id.
#[derive(Debug)]
pub struct RecordPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for RecordPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}

/// `?type=patient` switches the id of `GET /event/:id` to a patient id
#[derive(Debug, Default, Deserialize)]
pub struct LookupQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// Parsed lookup query string
#[derive(Debug)]
pub struct LookupParams(pub LookupQuery);

#[async_trait]
impl<S> FromRequestParts<S> for LookupParams
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<LookupQuery>::from_request_parts(parts, state).await?;
        Ok(Self(query))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!(error = %rejection, "Malformed request body");
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::warn!(error = %rejection, "Malformed path parameter");
        Self::new(StatusCode::BAD_REQUEST, INVALID_ID_MESSAGE)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(error = %rejection, "Malformed query string");
        Self::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    fn parts(uri: &str) -> Parts {
        let (parts, _) = HttpRequest::builder()
            .uri(uri)
            .body(())
            .unwrap()
            .into_parts();
        parts
    }

    #[tokio::test]
    async fn test_lookup_params_read_type() {
        let mut parts = parts("/event/abc?type=patient");
        let LookupParams(query) = LookupParams::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(query.kind.as_deref(), Some("patient"));
    }

    #[tokio::test]
    async fn test_lookup_params_reject_repeated_type() {
        let mut parts = parts("/event/abc?type=patient&type=event");
        let err = LookupParams::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(!err.message().is_empty());
    }

    #[tokio::test]
    async fn test_record_path_without_route_params_is_rejected() {
        let mut parts = parts("/patient/abc");
        let err = RecordPath::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), INVALID_ID_MESSAGE);
    }
}
