use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{AuditResponse, AuditSession, SessionSummary};

mod rate_limit;
mod report;
mod session;
mod user;

pub use rate_limit::RateLimitRepository;
pub use report::ReportRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

/// Session persistence seam. The sqlx repository is the production
/// implementation; tests script an in-memory one, the same arrangement the
/// generation pipeline uses for `Provider`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: Uuid) -> Result<AuditSession, sqlx::Error>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditSession>, sqlx::Error>;
    async fn upsert_response(
        &self,
        session_id: Uuid,
        domain: i32,
        answers: &serde_json::Value,
    ) -> Result<(), sqlx::Error>;
    async fn advance_domain(&self, session_id: Uuid, domain: i32) -> Result<i32, sqlx::Error>;
    async fn responses(&self, session_id: Uuid) -> Result<Vec<AuditResponse>, sqlx::Error>;
    async fn count_responses(&self, session_id: Uuid) -> Result<i64, sqlx::Error>;
    async fn claim_for_generation(&self, session_id: Uuid) -> Result<bool, sqlx::Error>;
    async fn mark_failed(&self, session_id: Uuid) -> Result<(), sqlx::Error>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SessionSummary>, sqlx::Error>;
}

/// Report persistence seam for the pipeline side: the transactional
/// completion and the status-poll lookup.
#[async_trait]
pub trait ReportStore: Send + Sync {
    async fn complete_session(
        &self,
        session_id: Uuid,
        automation_map: &serde_json::Value,
        impl_guide: &serde_json::Value,
    ) -> Result<Uuid, sqlx::Error>;
    async fn find_id_by_session(&self, session_id: Uuid) -> Result<Option<Uuid>, sqlx::Error>;
}

/// Durable attempt log behind the rate governor.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    async fn count_since(&self, key: &str, window_start: DateTime<Utc>)
        -> Result<i64, sqlx::Error>;
    async fn record(&self, key: &str) -> Result<(), sqlx::Error>;
    async fn purge_older_than(&self, cutoff: DateTime<Utc>) -> Result<u64, sqlx::Error>;
}
