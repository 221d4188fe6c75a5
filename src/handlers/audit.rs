use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    domains::DOMAINS,
    error::AppResult,
    middleware::AuthUser,
    models::{SessionStatusResponse, SessionSummary},
};

#[derive(Debug, Deserialize)]
pub struct SubmitResponseInput {
    pub domain: i32,
    pub answers: HashMap<String, String>,
}

pub async fn list_domains() -> Json<Value> {
    Json(json!({ "domains": DOMAINS }))
}

pub async fn start_session(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<(StatusCode, Json<Value>)> {
    let session = state.audit_service.start(auth.id).await?;

    Ok((StatusCode::CREATED, Json(json!({ "sessionId": session.id }))))
}

pub async fn list_sessions(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<SessionSummary>>> {
    let sessions = state.audit_service.list(auth.id).await?;

    Ok(Json(sessions))
}

pub async fn submit_response(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
    Json(input): Json<SubmitResponseInput>,
) -> AppResult<Json<Value>> {
    let current_domain = state
        .audit_service
        .submit_response(session_id, auth.id, auth.role, input.domain, input.answers)
        .await?;

    Ok(Json(json!({ "ok": true, "currentDomain": current_domain })))
}

pub async fn get_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<SessionStatusResponse>> {
    let status = state
        .audit_service
        .status(session_id, auth.id, auth.role)
        .await?;

    Ok(Json(status))
}

pub async fn generate_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(session_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    let report_id = state
        .orchestrator
        .generate(session_id, auth.id, auth.role)
        .await?;

    Ok(Json(json!({ "reportId": report_id })))
}
