use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use super::SessionStore;
use crate::models::{AuditResponse, AuditSession, SessionSummary};

#[derive(Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Re-arm sessions stuck in `generating` past the deadline, e.g. after a
    /// crash mid-call. They become `failed`, which permits a retry.
    #[instrument(name = "db.session.sweep_stuck", skip(self))]
    pub async fn sweep_stuck(&self, deadline_secs: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE audit_sessions
            SET status = 'failed', generating_since = NULL
            WHERE status = 'generating'
              AND generating_since < NOW() - ($1 * INTERVAL '1 second')
            "#,
        )
        .bind(deadline_secs)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    #[instrument(name = "db.session.count_by_status", skip(self))]
    pub async fn count_by_status(&self, status: &str) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM audit_sessions WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    #[instrument(name = "db.session.create", skip(self))]
    async fn create(&self, user_id: Uuid) -> Result<AuditSession, sqlx::Error> {
        sqlx::query_as::<_, AuditSession>(
            r#"
            INSERT INTO audit_sessions (user_id)
            VALUES ($1)
            RETURNING id, user_id, status, current_domain, created_at, completed_at, generating_since
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
    }

    #[instrument(name = "db.session.find_by_id", skip(self))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditSession>, sqlx::Error> {
        sqlx::query_as::<_, AuditSession>(
            "SELECT id, user_id, status, current_domain, created_at, completed_at, generating_since \
             FROM audit_sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Full replacement of the answers for (session, domain); a resubmission
    /// never produces a second row.
    #[instrument(name = "db.session.upsert_response", skip(self, answers))]
    async fn upsert_response(
        &self,
        session_id: Uuid,
        domain: i32,
        answers: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO audit_responses (session_id, domain, answers)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_id, domain)
            DO UPDATE SET answers = EXCLUDED.answers, updated_at = NOW()
            "#,
        )
        .bind(session_id)
        .bind(domain)
        .bind(answers)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// `current_domain = max(current_domain, min(domain + 1, 9))`, computed
    /// in the database so concurrent submits cannot regress progress.
    #[instrument(name = "db.session.advance_domain", skip(self))]
    async fn advance_domain(&self, session_id: Uuid, domain: i32) -> Result<i32, sqlx::Error> {
        let row = sqlx::query(
            r#"
            UPDATE audit_sessions
            SET current_domain = GREATEST(current_domain, LEAST($2 + 1, 9))
            WHERE id = $1
            RETURNING current_domain
            "#,
        )
        .bind(session_id)
        .bind(domain)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<i32, _>("current_domain"))
    }

    #[instrument(name = "db.session.responses", skip(self))]
    async fn responses(&self, session_id: Uuid) -> Result<Vec<AuditResponse>, sqlx::Error> {
        sqlx::query_as::<_, AuditResponse>(
            "SELECT id, session_id, domain, answers FROM audit_responses \
             WHERE session_id = $1 ORDER BY domain ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "db.session.count_responses", skip(self))]
    async fn count_responses(&self, session_id: Uuid) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM audit_responses WHERE session_id = $1")
            .bind(session_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    /// Conditional transition into `generating`. Only one of several
    /// concurrent generate requests wins the UPDATE; the rest see `false`.
    #[instrument(name = "db.session.claim_for_generation", skip(self))]
    async fn claim_for_generation(&self, session_id: Uuid) -> Result<bool, sqlx::Error> {
        let claimed = sqlx::query(
            r#"
            UPDATE audit_sessions
            SET status = 'generating', generating_since = NOW()
            WHERE id = $1 AND status IN ('in_progress', 'failed')
            RETURNING id
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(claimed.is_some())
    }

    #[instrument(name = "db.session.mark_failed", skip(self))]
    async fn mark_failed(&self, session_id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE audit_sessions
            SET status = 'failed', generating_since = NULL
            WHERE id = $1 AND status = 'generating'
            "#,
        )
        .bind(session_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    #[instrument(name = "db.session.list_for_user", skip(self))]
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SessionSummary>, sqlx::Error> {
        sqlx::query_as::<_, SessionSummary>(
            r#"
            SELECT s.id, s.status, s.current_domain, s.created_at, s.completed_at,
                   r.id as report_id
            FROM audit_sessions s
            LEFT JOIN audit_reports r ON r.session_id = s.id
            WHERE s.user_id = $1
            ORDER BY s.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }
}
