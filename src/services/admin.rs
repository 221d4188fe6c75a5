use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::Role,
    repository::{ReportRepository, SessionRepository, UserRepository},
};

/// Platform-wide counters for the admin overview.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: i64,
    pub total_reports: i64,
    pub completed_sessions: i64,
    pub in_progress_sessions: i64,
    pub reports_this_week: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUserSummary {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub audit_count: i64,
}

/// Admin-only read surface over users and sessions. Report listing lives in
/// the report service; this covers the overview counters and the user table.
#[derive(Clone)]
pub struct AdminService {
    users: UserRepository,
    sessions: SessionRepository,
    reports: ReportRepository,
}

impl AdminService {
    pub fn new(
        users: UserRepository,
        sessions: SessionRepository,
        reports: ReportRepository,
    ) -> Self {
        Self {
            users,
            sessions,
            reports,
        }
    }

    #[instrument(name = "admin.stats", skip(self))]
    pub async fn stats(&self, caller_role: Role) -> AppResult<AdminStats> {
        if !caller_role.is_admin() {
            return Err(AppError::Forbidden);
        }

        let week_ago = Utc::now() - Duration::days(7);

        Ok(AdminStats {
            total_users: self.users.count().await?,
            total_reports: self.reports.count().await?,
            completed_sessions: self.sessions.count_by_status("completed").await?,
            in_progress_sessions: self.sessions.count_by_status("in_progress").await?,
            reports_this_week: self.reports.count_created_since(week_ago).await?,
        })
    }

    #[instrument(name = "admin.users", skip(self))]
    pub async fn users(&self, caller_role: Role) -> AppResult<Vec<AdminUserSummary>> {
        if !caller_role.is_admin() {
            return Err(AppError::Forbidden);
        }

        let rows = self.users.list_with_audit_counts().await?;

        Ok(rows
            .into_iter()
            .map(|u| AdminUserSummary {
                id: u.id,
                email: u.email,
                name: u.name,
                role: u.role,
                created_at: u.created_at,
                audit_count: u.audit_count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = AdminStats {
            total_users: 10,
            total_reports: 4,
            completed_sessions: 4,
            in_progress_sessions: 2,
            reports_this_week: 1,
        };
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(value["totalUsers"], json!(10));
        assert_eq!(value["reportsThisWeek"], json!(1));
        assert!(value.get("total_users").is_none());
    }

    #[test]
    fn test_user_summary_serialize_camel_case() {
        let summary = AdminUserSummary {
            id: Uuid::new_v4(),
            email: "ada@example.com".into(),
            name: "Ada".into(),
            role: "user".into(),
            created_at: Utc::now(),
            audit_count: 3,
        };
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["auditCount"], json!(3));
        assert_eq!(value["createdAt"], value["createdAt"]);
        assert!(value.get("audit_count").is_none());
    }
}
