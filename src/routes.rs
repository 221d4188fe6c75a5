use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::{AppState, handlers};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route("/api/domains", get(handlers::list_domains))
        .route("/api/register", post(handlers::register))
        .route("/api/login", post(handlers::login))
        .route("/api/user", get(handlers::get_user))
        .route(
            "/api/audit",
            get(handlers::list_sessions).post(handlers::start_session),
        )
        .route("/api/audit/{session_id}", get(handlers::get_status))
        .route(
            "/api/audit/{session_id}/response",
            patch(handlers::submit_response),
        )
        .route(
            "/api/audit/{session_id}/generate",
            post(handlers::generate_report),
        )
        .route("/api/report/{report_id}/data", get(handlers::get_report_data))
        .route("/api/report/{report_id}/pdf", get(handlers::download_report))
        .route("/api/report/{report_id}/email", post(handlers::email_report))
        .route("/api/admin/reports", get(handlers::list_reports))
        .route("/api/admin/stats", get(handlers::get_stats))
        .route("/api/admin/users", get(handlers::list_users))
        .with_state(state)
}
