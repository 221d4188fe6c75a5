use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, header},
    response::IntoResponse,
};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, AppResult},
    middleware::AuthUser,
    services::ReportDataResponse,
};

pub async fn get_report_data(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
) -> AppResult<Json<ReportDataResponse>> {
    let data = state
        .report_service
        .get_data(report_id, auth.id, auth.role)
        .await?;

    Ok(Json(data))
}

pub async fn download_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let rendered = state
        .report_service
        .render(report_id, auth.id, auth.role)
        .await?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(rendered.content_type),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", rendered.filename))
            .map_err(|e| AppError::Internal(format!("Invalid filename: {e}")))?,
    );

    Ok((headers, rendered.bytes))
}

pub async fn email_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(report_id): Path<Uuid>,
) -> AppResult<Json<Value>> {
    state
        .report_service
        .deliver(report_id, auth.id, auth.role)
        .await?;

    Ok(Json(json!({ "success": true })))
}
