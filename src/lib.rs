pub mod config;
pub mod database;
pub mod delivery;
pub mod domains;
pub mod error;
pub mod handlers;
pub mod jobs;
pub mod llm;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod reconcile;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;

pub use config::Config;

use std::sync::Arc;

use pipeline::Orchestrator;
use services::{AdminService, AuditService, AuthService, RateLimiter, ReportService};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub audit_service: AuditService,
    pub report_service: ReportService,
    pub admin_service: AdminService,
    pub orchestrator: Orchestrator,
    pub rate_limiter: RateLimiter,
}
