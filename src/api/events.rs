//! `/event` handlers

use super::envelope::Envelope;
use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, LookupParams, RecordPath};
use super::state::AppState;
use crate::core::records::LookupScope;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;

pub async fn list_events(State(state): State<AppState>) -> ApiResult {
    let events = state
        .manager
        .list_events()
        .await
        .map_err(ApiError::storage_as_bad_request)?;
    Ok(Envelope::success(StatusCode::OK, json!({ "events": events })))
}

pub async fn find_events(
    State(state): State<AppState>,
    RecordPath(id): RecordPath,
    LookupParams(query): LookupParams,
) -> ApiResult {
    let scope = LookupScope::from_query(query.kind.as_deref());
    let events = state.manager.find_events(&id, scope).await?;
    Ok(Envelope::success(StatusCode::OK, json!({ "event": events })))
}

pub async fn create_event(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult {
    let event = state
        .manager
        .create_event(&body)
        .await
        .map_err(ApiError::storage_as_bad_request)?;
    Ok(Envelope::success(StatusCode::CREATED, json!({ "event": event })))
}

pub async fn update_event(
    State(state): State<AppState>,
    RecordPath(id): RecordPath,
    JsonBody(body): JsonBody,
) -> ApiResult {
    let outcome = state
        .manager
        .update_event(&id, body)
        .await
        .map_err(ApiError::storage_as_bad_request)?;
    Ok(Envelope::success(StatusCode::OK, json!(outcome)))
}

pub async fn delete_event(State(state): State<AppState>, RecordPath(id): RecordPath) -> ApiResult {
    let event = state.manager.delete_event(&id).await?;
    Ok(Envelope::success(StatusCode::OK, json!({ "event": event })))
}
