use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::AppResult,
    middleware::AuthUser,
    services::{AdminReportSummary, AdminStats, AdminUserSummary},
};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

pub async fn list_reports(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<AdminReportSummary>>> {
    let reports = state
        .report_service
        .list(auth.role, query.limit, query.offset)
        .await?;

    Ok(Json(reports))
}

pub async fn get_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<AdminStats>> {
    let stats = state.admin_service.stats(auth.role).await?;

    Ok(Json(stats))
}

pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<AdminUserSummary>>> {
    let users = state.admin_service.users(auth.role).await?;

    Ok(Json(users))
}
