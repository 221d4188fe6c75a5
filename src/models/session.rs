use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle of one audit attempt.
///
/// `in_progress → generating → completed | failed`, with `failed` re-entering
/// `generating` on a retry. `completed` is the only state that owns a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    InProgress,
    Generating,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Generating => "generating",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in_progress" => Some(SessionStatus::InProgress),
            "generating" => Some(SessionStatus::Generating),
            "completed" => Some(SessionStatus::Completed),
            "failed" => Some(SessionStatus::Failed),
            _ => None,
        }
    }

    /// States from which a generate request may claim the session.
    pub fn can_start_generation(&self) -> bool {
        matches!(self, SessionStatus::InProgress | SessionStatus::Failed)
    }

    /// Responses are frozen once generation is running or done.
    pub fn accepts_responses(&self) -> bool {
        matches!(self, SessionStatus::InProgress | SessionStatus::Failed)
    }
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditSession {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: String,
    pub current_domain: i32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub generating_since: Option<DateTime<Utc>>,
}

impl AuditSession {
    pub fn status(&self) -> Option<SessionStatus> {
        SessionStatus::parse(&self.status)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct AuditResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub domain: i32,
    pub answers: serde_json::Value,
}

/// Polling payload for `GET /api/audit/{session_id}`.
#[derive(Debug, Serialize)]
pub struct SessionStatusResponse {
    pub status: String,
    pub current_domain: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<Uuid>,
}

/// One row of a user's session listing, report id joined in when one exists.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub status: String,
    pub current_domain: i32,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<Uuid>,
}

/// Progress never regresses, even when domains arrive out of order or are
/// resubmitted, and never exceeds the last domain.
pub fn advance_domain(current: i32, submitted: i32) -> i32 {
    current.max((submitted + 1).min(crate::domains::DOMAIN_COUNT))
}
