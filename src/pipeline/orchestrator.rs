use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::llm::{GenerateRequest, LlmClient};
use crate::models::{Role, SessionStatus};
use crate::repository::{ReportStore, SessionStore};
use crate::telemetry::metrics::{GENERATION_FAILURES, REPORT_GENERATION_DURATION, REPORTS_GENERATED};

use super::{parse, prompt};

/// Drives one generation attempt end to end: claim the session, assemble the
/// prompt, call the generation service, parse, persist. The session is
/// claimed with a conditional transition, so concurrent attempts on the same
/// session cannot both run.
#[derive(Clone)]
pub struct Orchestrator {
    sessions: Arc<dyn SessionStore>,
    reports: Arc<dyn ReportStore>,
    llm: Arc<LlmClient>,
    model: String,
    max_tokens: u32,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        reports: Arc<dyn ReportStore>,
        llm: Arc<LlmClient>,
        model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            reports,
            llm,
            model,
            max_tokens,
            timeout,
        }
    }

    #[tracing::instrument(
        name = "pipeline generate",
        skip(self),
        fields(report.id, report.domains, report.duration_ms)
    )]
    pub async fn generate(
        &self,
        session_id: Uuid,
        caller_id: Uuid,
        caller_role: Role,
    ) -> AppResult<Uuid> {
        let start = std::time::Instant::now();

        let session = self
            .sessions
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

        if session.user_id != caller_id && !caller_role.is_admin() {
            return Err(AppError::Forbidden);
        }

        if session.status() == Some(SessionStatus::Completed) {
            return Err(AppError::Conflict(
                "Session already has a report".to_string(),
            ));
        }

        // Guard before any state change: an empty session never enters
        // `generating`.
        if self.sessions.count_responses(session_id).await? == 0 {
            return Err(AppError::Validation(
                "No responses found for this session".to_string(),
            ));
        }

        // Durable `generating` mark, written before the slow external call so
        // pollers immediately observe progress. Only one concurrent caller
        // wins this transition.
        if !self.sessions.claim_for_generation(session_id).await? {
            return Err(AppError::Conflict(
                "Report generation already in progress".to_string(),
            ));
        }

        match self.run_generation(session_id).await {
            Ok(report_id) => {
                let duration = start.elapsed();
                REPORTS_GENERATED.add(1, &[]);
                REPORT_GENERATION_DURATION.record(duration.as_secs_f64(), &[]);

                let span = tracing::Span::current();
                span.record("report.id", report_id.to_string());
                span.record("report.duration_ms", duration.as_millis() as i64);

                tracing::info!(%session_id, %report_id, "Report generated");
                Ok(report_id)
            }
            Err(err) => {
                GENERATION_FAILURES.add(1, &[]);
                tracing::error!(%session_id, error = %err, "Generation attempt failed");

                if let Err(mark_err) = self.sessions.mark_failed(session_id).await {
                    tracing::error!(%session_id, error = %mark_err, "Failed to mark session failed");
                }

                // Callers get a generic failure; the cause stays in the logs.
                Err(AppError::Generation(err.to_string()))
            }
        }
    }

    /// Steps 3-6: everything after the session has been claimed. Any error
    /// here sends the session to `failed`.
    async fn run_generation(&self, session_id: Uuid) -> anyhow::Result<Uuid> {
        let responses = self.sessions.responses(session_id).await?;
        tracing::Span::current().record("report.domains", responses.len());

        let req = GenerateRequest {
            model: self.model.clone(),
            system: prompt::SYSTEM_PROMPT.to_string(),
            prompt: prompt::build_user_prompt(&responses),
            max_tokens: self.max_tokens,
        };

        let response = tokio::time::timeout(self.timeout, self.llm.generate(&req))
            .await
            .map_err(|_| anyhow::anyhow!("generation timed out after {:?}", self.timeout))??;

        let data = parse::parse_report(&response.content)?;

        let full_artifact = serde_json::to_value(&data)?;
        let guide_subset = serde_json::to_value(&data.implementation_guide)?;

        let report_id = self
            .reports
            .complete_session(session_id, &full_artifact, &guide_subset)
            .await?;

        Ok(report_id)
    }
}
