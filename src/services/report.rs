use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    delivery::{DocumentRenderer, RenderContext, ReportAttachment, ReportMailer},
    error::{AppError, AppResult},
    models::{ReportData, ReportWithOwner, Role},
    reconcile::reconcile,
    repository::ReportRepository,
    telemetry::metrics::REPORTS_EMAILED,
};

#[derive(Debug, Serialize)]
pub struct ReportOwner {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Canonical read payload: report metadata plus the reconciled report body
/// flattened in at the top level.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDataResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub emailed_at: Option<DateTime<Utc>>,
    pub pdf_path: Option<String>,
    pub user: ReportOwner,
    #[serde(flatten)]
    pub data: ReportData,
}

/// One row of the admin listing. Blobs stay behind; the listing is metadata
/// only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReportSummary {
    pub id: Uuid,
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub emailed_at: Option<DateTime<Utc>>,
    pub user: ReportOwner,
}

pub struct RenderedReport {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Read, download, and delivery paths for finished reports. Every entry
/// point re-reconciles the stored blobs; nothing downstream sees raw
/// artifacts.
#[derive(Clone)]
pub struct ReportService {
    reports: ReportRepository,
    renderer: Arc<dyn DocumentRenderer>,
    mailer: Arc<dyn ReportMailer>,
    app_base_url: String,
}

impl ReportService {
    pub fn new(
        reports: ReportRepository,
        renderer: Arc<dyn DocumentRenderer>,
        mailer: Arc<dyn ReportMailer>,
        app_base_url: String,
    ) -> Self {
        Self {
            reports,
            renderer,
            mailer,
            app_base_url,
        }
    }

    #[instrument(name = "report.get_data", skip(self))]
    pub async fn get_data(
        &self,
        report_id: Uuid,
        caller_id: Uuid,
        caller_role: Role,
    ) -> AppResult<ReportDataResponse> {
        let report = self.owned_report(report_id, caller_id, caller_role).await?;
        let data = reconcile(&report.automation_map, &report.impl_guide);

        Ok(ReportDataResponse {
            id: report.id,
            created_at: report.created_at,
            emailed_at: report.emailed_at,
            pdf_path: report.pdf_path,
            user: ReportOwner {
                id: report.user_id,
                name: report.user_name,
                email: report.user_email,
            },
            data,
        })
    }

    /// Reconcile and typeset the report for download.
    #[instrument(name = "report.render", skip(self))]
    pub async fn render(
        &self,
        report_id: Uuid,
        caller_id: Uuid,
        caller_role: Role,
    ) -> AppResult<RenderedReport> {
        let report = self.owned_report(report_id, caller_id, caller_role).await?;
        Ok(self.render_report(&report)?)
    }

    /// Email the rendered report to its owner and stamp `emailed_at`. The
    /// stamp only moves on successful handoff to the provider.
    #[instrument(name = "report.deliver", skip(self))]
    pub async fn deliver(
        &self,
        report_id: Uuid,
        caller_id: Uuid,
        caller_role: Role,
    ) -> AppResult<()> {
        let report = self.owned_report(report_id, caller_id, caller_role).await?;

        let rendered = self.render_report(&report)?;
        let download_url = format!("{}/api/report/{}/pdf", self.app_base_url, report.id);
        let user_name = if report.user_name.is_empty() {
            "there"
        } else {
            &report.user_name
        };

        self.mailer
            .send_report(
                &report.user_email,
                user_name,
                &download_url,
                ReportAttachment {
                    filename: rendered.filename,
                    bytes: rendered.bytes,
                },
            )
            .await
            .map_err(|e| {
                tracing::error!(%report_id, error = %e, "Report email failed");
                AppError::Internal("Failed to send report email".to_string())
            })?;

        self.reports.mark_emailed(report.id).await?;
        REPORTS_EMAILED.add(1, &[]);
        tracing::info!(%report_id, "Report emailed");

        Ok(())
    }

    #[instrument(name = "report.list", skip(self))]
    pub async fn list(
        &self,
        caller_role: Role,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<AdminReportSummary>> {
        if !caller_role.is_admin() {
            return Err(AppError::Forbidden);
        }

        let rows = self.reports.list(limit.clamp(1, 200), offset.max(0)).await?;

        Ok(rows
            .into_iter()
            .map(|r| AdminReportSummary {
                id: r.id,
                session_id: r.session_id,
                created_at: r.created_at,
                emailed_at: r.emailed_at,
                user: ReportOwner {
                    id: r.user_id,
                    name: r.user_name,
                    email: r.user_email,
                },
            })
            .collect())
    }

    fn render_report(&self, report: &ReportWithOwner) -> AppResult<RenderedReport> {
        let data = reconcile(&report.automation_map, &report.impl_guide);
        let ctx = RenderContext {
            user_name: if report.user_name.is_empty() {
                "there"
            } else {
                &report.user_name
            },
            generated_at: report.created_at.format("%B %-d, %Y").to_string(),
        };

        let bytes = self.renderer.render(&ctx, &data).map_err(|e| {
            tracing::error!(report_id = %report.id, error = %e, "Report rendering failed");
            AppError::Internal("Failed to render report".to_string())
        })?;

        let short_id = report.id.simple().to_string();
        Ok(RenderedReport {
            filename: format!(
                "life-audit-report-{}.{}",
                &short_id[..8],
                self.renderer.file_extension()
            ),
            content_type: self.renderer.content_type(),
            bytes,
        })
    }

    async fn owned_report(
        &self,
        report_id: Uuid,
        caller_id: Uuid,
        caller_role: Role,
    ) -> AppResult<ReportWithOwner> {
        let report = self
            .reports
            .find_with_owner(report_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Report not found".to_string()))?;

        if report.user_id != caller_id && !caller_role.is_admin() {
            return Err(AppError::Forbidden);
        }

        Ok(report)
    }
}
