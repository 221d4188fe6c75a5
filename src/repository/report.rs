use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use super::ReportStore;
use crate::models::{AuditReport, ReportWithOwner};

const REPORT_WITH_OWNER_SELECT: &str = r#"
    SELECT
        r.id, r.session_id, r.automation_map, r.impl_guide,
        r.created_at, r.emailed_at, r.pdf_path,
        u.id as user_id, u.name as user_name, u.email as user_email
    FROM audit_reports r
    JOIN audit_sessions s ON r.session_id = s.id
    JOIN users u ON s.user_id = u.id
"#;

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[instrument(name = "db.report.find_by_id", skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditReport>, sqlx::Error> {
        sqlx::query_as::<_, AuditReport>(
            "SELECT id, session_id, automation_map, impl_guide, created_at, emailed_at, pdf_path \
             FROM audit_reports WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    #[instrument(name = "db.report.find_with_owner", skip(self))]
    pub async fn find_with_owner(&self, id: Uuid) -> Result<Option<ReportWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, ReportWithOwner>(&format!("{REPORT_WITH_OWNER_SELECT} WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    #[instrument(name = "db.report.mark_emailed", skip(self))]
    pub async fn mark_emailed(&self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE audit_reports SET emailed_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    #[instrument(name = "db.report.list", skip(self))]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ReportWithOwner>, sqlx::Error> {
        sqlx::query_as::<_, ReportWithOwner>(&format!(
            "{REPORT_WITH_OWNER_SELECT} ORDER BY r.created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
    }

    #[instrument(name = "db.report.count", skip(self))]
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM audit_reports")
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }

    #[instrument(name = "db.report.count_created_since", skip(self))]
    pub async fn count_created_since(&self, since: DateTime<Utc>) -> Result<i64, sqlx::Error> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM audit_reports WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.get::<i64, _>("count"))
    }
}

#[async_trait]
impl ReportStore for ReportRepository {
    /// Persist the report and complete the session in one transaction, so a
    /// crash cannot leave a `completed` session without a report or vice
    /// versa. The unique constraint on `session_id` makes a concurrent
    /// duplicate insert a no-op: the loser gets the existing report id back.
    #[instrument(name = "db.report.complete_session", skip(self, automation_map, impl_guide))]
    async fn complete_session(
        &self,
        session_id: Uuid,
        automation_map: &serde_json::Value,
        impl_guide: &serde_json::Value,
    ) -> Result<Uuid, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO audit_reports (session_id, automation_map, impl_guide)
            VALUES ($1, $2, $3)
            ON CONFLICT (session_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(session_id)
        .bind(automation_map)
        .bind(impl_guide)
        .fetch_optional(&mut *tx)
        .await?;

        let report_id = match inserted {
            Some(row) => row.get::<Uuid, _>("id"),
            None => {
                sqlx::query("SELECT id FROM audit_reports WHERE session_id = $1")
                    .bind(session_id)
                    .fetch_one(&mut *tx)
                    .await?
                    .get::<Uuid, _>("id")
            }
        };

        sqlx::query(
            r#"
            UPDATE audit_sessions
            SET status = 'completed', completed_at = NOW(), generating_since = NULL
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(report_id)
    }

    #[instrument(name = "db.report.find_id_by_session", skip(self))]
    async fn find_id_by_session(&self, session_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        let row = sqlx::query("SELECT id FROM audit_reports WHERE session_id = $1")
            .bind(session_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get::<Uuid, _>("id")))
    }
}
