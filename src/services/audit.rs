use std::collections::HashMap;
use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::{
    domains,
    error::{AppError, AppResult},
    models::{AuditSession, Role, SessionStatus, SessionStatusResponse, SessionSummary},
    repository::{ReportStore, SessionStore},
    telemetry::metrics::{RESPONSES_SAVED, SESSIONS_STARTED},
};

/// Session lifecycle and response collection. Generation itself lives in the
/// pipeline orchestrator; this service owns everything up to it.
#[derive(Clone)]
pub struct AuditService {
    sessions: Arc<dyn SessionStore>,
    reports: Arc<dyn ReportStore>,
}

impl AuditService {
    pub fn new(sessions: Arc<dyn SessionStore>, reports: Arc<dyn ReportStore>) -> Self {
        Self { sessions, reports }
    }

    #[instrument(name = "audit.start", skip(self))]
    pub async fn start(&self, user_id: Uuid) -> AppResult<AuditSession> {
        let session = self.sessions.create(user_id).await?;

        SESSIONS_STARTED.add(1, &[]);
        tracing::info!(session_id = %session.id, "Audit session started");

        Ok(session)
    }

    /// Idempotent per-domain upsert: a retry or resubmission fully replaces
    /// the stored answers and never duplicates a row. Progress only moves
    /// forward.
    #[instrument(name = "audit.submit_response", skip(self, answers))]
    pub async fn submit_response(
        &self,
        session_id: Uuid,
        caller_id: Uuid,
        caller_role: Role,
        domain: i32,
        answers: HashMap<String, String>,
    ) -> AppResult<i32> {
        if !domains::is_valid_domain(domain) {
            return Err(AppError::Validation(
                "domain must be between 1 and 9".to_string(),
            ));
        }
        if answers.is_empty() {
            return Err(AppError::Validation("answers must not be empty".to_string()));
        }

        let session = self.owned_session(session_id, caller_id, caller_role).await?;

        match session.status() {
            Some(status) if status.accepts_responses() => {}
            _ => {
                return Err(AppError::Conflict(
                    "Session no longer accepts responses".to_string(),
                ));
            }
        }

        let answers_json = serde_json::to_value(&answers)
            .map_err(|e| AppError::Internal(format!("Failed to encode answers: {e}")))?;

        self.sessions
            .upsert_response(session_id, domain, &answers_json)
            .await?;

        let current_domain = self.sessions.advance_domain(session_id, domain).await?;

        RESPONSES_SAVED.add(1, &[]);
        tracing::info!(%session_id, domain, current_domain, "Response saved");

        Ok(current_domain)
    }

    /// Read side of the polling contract: status plus, once completed, the
    /// report id to redirect to.
    #[instrument(name = "audit.status", skip(self))]
    pub async fn status(
        &self,
        session_id: Uuid,
        caller_id: Uuid,
        caller_role: Role,
    ) -> AppResult<SessionStatusResponse> {
        let session = self.owned_session(session_id, caller_id, caller_role).await?;

        let report_id = if session.status() == Some(SessionStatus::Completed) {
            self.reports.find_id_by_session(session_id).await?
        } else {
            None
        };

        Ok(SessionStatusResponse {
            status: session.status,
            current_domain: session.current_domain,
            report_id,
        })
    }

    /// The caller's sessions, newest first, with report ids joined in.
    #[instrument(name = "audit.list", skip(self))]
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<SessionSummary>> {
        Ok(self.sessions.list_for_user(user_id).await?)
    }

    async fn owned_session(
        &self,
        session_id: Uuid,
        caller_id: Uuid,
        caller_role: Role,
    ) -> AppResult<AuditSession> {
        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

        if session.user_id != caller_id && !caller_role.is_admin() {
            return Err(AppError::Forbidden);
        }

        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::Value;
    use std::sync::Mutex;

    use crate::models::{AuditResponse, advance_domain};

    struct State {
        session: AuditSession,
        responses: HashMap<i32, Value>,
        report_id: Option<Uuid>,
    }

    #[derive(Clone)]
    struct FakeStore(Arc<Mutex<State>>);

    impl FakeStore {
        fn with_session(status: &str) -> (Self, Uuid, Uuid) {
            let session_id = Uuid::new_v4();
            let user_id = Uuid::new_v4();
            let store = Self(Arc::new(Mutex::new(State {
                session: AuditSession {
                    id: session_id,
                    user_id,
                    status: status.to_string(),
                    current_domain: 1,
                    created_at: Utc::now(),
                    completed_at: None,
                    generating_since: None,
                },
                responses: HashMap::new(),
                report_id: None,
            })));
            (store, session_id, user_id)
        }

        fn response_count(&self) -> usize {
            self.0.lock().unwrap().responses.len()
        }

        fn set_report(&self, id: Uuid) {
            self.0.lock().unwrap().report_id = Some(id);
        }
    }

    #[async_trait]
    impl SessionStore for FakeStore {
        async fn create(&self, _user_id: Uuid) -> Result<AuditSession, sqlx::Error> {
            Ok(self.0.lock().unwrap().session.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<AuditSession>, sqlx::Error> {
            let state = self.0.lock().unwrap();
            Ok((state.session.id == id).then(|| state.session.clone()))
        }

        async fn upsert_response(
            &self,
            _session_id: Uuid,
            domain: i32,
            answers: &Value,
        ) -> Result<(), sqlx::Error> {
            self.0.lock().unwrap().responses.insert(domain, answers.clone());
            Ok(())
        }

        async fn advance_domain(&self, _session_id: Uuid, domain: i32) -> Result<i32, sqlx::Error> {
            let mut state = self.0.lock().unwrap();
            state.session.current_domain = advance_domain(state.session.current_domain, domain);
            Ok(state.session.current_domain)
        }

        async fn responses(&self, _session_id: Uuid) -> Result<Vec<AuditResponse>, sqlx::Error> {
            unreachable!("not exercised by these tests")
        }

        async fn count_responses(&self, _session_id: Uuid) -> Result<i64, sqlx::Error> {
            Ok(self.0.lock().unwrap().responses.len() as i64)
        }

        async fn claim_for_generation(&self, _session_id: Uuid) -> Result<bool, sqlx::Error> {
            unreachable!("not exercised by these tests")
        }

        async fn mark_failed(&self, _session_id: Uuid) -> Result<(), sqlx::Error> {
            unreachable!("not exercised by these tests")
        }

        async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<SessionSummary>, sqlx::Error> {
            let state = self.0.lock().unwrap();
            if state.session.user_id != user_id {
                return Ok(Vec::new());
            }
            Ok(vec![SessionSummary {
                id: state.session.id,
                status: state.session.status.clone(),
                current_domain: state.session.current_domain,
                created_at: state.session.created_at,
                completed_at: state.session.completed_at,
                report_id: state.report_id,
            }])
        }
    }

    #[async_trait]
    impl ReportStore for FakeStore {
        async fn complete_session(
            &self,
            _session_id: Uuid,
            _automation_map: &Value,
            _impl_guide: &Value,
        ) -> Result<Uuid, sqlx::Error> {
            unreachable!("not exercised by these tests")
        }

        async fn find_id_by_session(&self, _session_id: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
            Ok(self.0.lock().unwrap().report_id)
        }
    }

    fn service(store: &FakeStore) -> AuditService {
        AuditService::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    fn answers(text: &str) -> HashMap<String, String> {
        HashMap::from([("q1".to_string(), text.to_string())])
    }

    #[tokio::test]
    async fn test_resubmitting_domain_keeps_one_row() {
        let (store, session_id, user_id) = FakeStore::with_session("in_progress");
        let service = service(&store);

        service
            .submit_response(session_id, user_id, Role::User, 2, answers("first"))
            .await
            .unwrap();
        service
            .submit_response(session_id, user_id, Role::User, 2, answers("second"))
            .await
            .unwrap();

        assert_eq!(store.response_count(), 1);
        let stored = store.0.lock().unwrap().responses[&2].clone();
        assert_eq!(stored["q1"], "second");
    }

    #[tokio::test]
    async fn test_progress_monotonic_across_out_of_order_submits() {
        let (store, session_id, user_id) = FakeStore::with_session("in_progress");
        let service = service(&store);

        let after_four = service
            .submit_response(session_id, user_id, Role::User, 4, answers("a"))
            .await
            .unwrap();
        assert_eq!(after_four, 5);

        let after_one = service
            .submit_response(session_id, user_id, Role::User, 1, answers("b"))
            .await
            .unwrap();
        assert_eq!(after_one, 5);
    }

    #[tokio::test]
    async fn test_submit_rejected_once_completed() {
        let (store, session_id, user_id) = FakeStore::with_session("completed");
        let service = service(&store);

        let result = service
            .submit_response(session_id, user_id, Role::User, 1, answers("late"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(store.response_count(), 0);
    }

    #[tokio::test]
    async fn test_submit_rejected_while_generating() {
        let (store, session_id, user_id) = FakeStore::with_session("generating");
        let service = service(&store);

        let result = service
            .submit_response(session_id, user_id, Role::User, 1, answers("late"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_submit_validates_domain_and_answers() {
        let (store, session_id, user_id) = FakeStore::with_session("in_progress");
        let service = service(&store);

        let bad_domain = service
            .submit_response(session_id, user_id, Role::User, 10, answers("x"))
            .await;
        assert!(matches!(bad_domain, Err(AppError::Validation(_))));

        let empty = service
            .submit_response(session_id, user_id, Role::User, 1, HashMap::new())
            .await;
        assert!(matches!(empty, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_foreign_session_hidden_from_other_users() {
        let (store, session_id, _user_id) = FakeStore::with_session("in_progress");
        let service = service(&store);

        let result = service
            .submit_response(session_id, Uuid::new_v4(), Role::User, 1, answers("x"))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_status_reports_id_only_when_completed() {
        let (store, session_id, user_id) = FakeStore::with_session("in_progress");
        let service = service(&store);

        let report_id = Uuid::new_v4();
        store.set_report(report_id);

        let status = service
            .status(session_id, user_id, Role::User)
            .await
            .unwrap();
        assert_eq!(status.report_id, None);

        store.0.lock().unwrap().session.status = "completed".to_string();
        let status = service
            .status(session_id, user_id, Role::User)
            .await
            .unwrap();
        assert_eq!(status.report_id, Some(report_id));
    }

    #[tokio::test]
    async fn test_list_scoped_to_caller() {
        let (store, session_id, user_id) = FakeStore::with_session("in_progress");
        let service = service(&store);

        let own = service.list(user_id).await.unwrap();
        assert_eq!(own.len(), 1);
        assert_eq!(own[0].id, session_id);

        let other = service.list(Uuid::new_v4()).await.unwrap();
        assert!(other.is_empty());
    }
}
