use axum::{Json, extract::State, http::StatusCode};
use chrono::Duration;

use crate::{
    AppState,
    error::{AppError, AppResult},
    middleware::{AuthUser, ClientIp},
    models::{LoginInput, ProfileResponse, RegisterInput, UserResponse},
};

pub async fn register(
    State(state): State<AppState>,
    ClientIp(client): ClientIp,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let allowed = state
        .rate_limiter
        .check(
            "register",
            &client,
            state.config.register_rate_max,
            Duration::seconds(state.config.register_rate_window_secs),
        )
        .await;
    if !allowed {
        return Err(AppError::RateLimited);
    }

    let user = state.auth_service.register(input).await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginInput>,
) -> AppResult<Json<UserResponse>> {
    let user = state.auth_service.login(input).await?;

    Ok(Json(UserResponse { user }))
}

pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<ProfileResponse>> {
    let user = state.auth_service.get_user(auth.id).await?;

    Ok(Json(ProfileResponse::from(user)))
}
