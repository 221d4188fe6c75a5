use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{AppState, error::AppResult};

pub async fn health_check(State(state): State<AppState>) -> AppResult<Json<Value>> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;

    Ok(Json(json!({ "status": "ok" })))
}
