//! `/patient` handlers

use super::envelope::Envelope;
use super::error::{ApiError, ApiResult};
use super::extract::{JsonBody, RecordPath};
use super::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;

pub async fn list_patients(State(state): State<AppState>) -> ApiResult {
    let patients = state.manager.list_patients().await?;
    Ok(Envelope::success(StatusCode::OK, json!({ "patients": patients })))
}

pub async fn get_patient(State(state): State<AppState>, RecordPath(id): RecordPath) -> ApiResult {
    let patient = state.manager.get_patient(&id).await?;
    Ok(Envelope::success(StatusCode::OK, json!({ "patient": patient })))
}

pub async fn create_patient(State(state): State<AppState>, JsonBody(body): JsonBody) -> ApiResult {
    let patient = state
        .manager
        .create_patient(&body)
        .await
        .map_err(ApiError::storage_as_bad_request)?;
    Ok(Envelope::success(StatusCode::CREATED, json!({ "patient": patient })))
}

pub async fn update_patient(
    State(state): State<AppState>,
    RecordPath(id): RecordPath,
    JsonBody(body): JsonBody,
) -> ApiResult {
    let outcome = state.manager.update_patient(&id, body).await?;
    Ok(Envelope::success(StatusCode::OK, json!(outcome)))
}

pub async fn delete_patient(State(state): State<AppState>, RecordPath(id): RecordPath) -> ApiResult {
    let removed = state.manager.delete_patient(&id).await?;
    Ok(Envelope::success(StatusCode::OK, json!({ "removed": removed })))
}
