use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

/// A rendered report ready to be attached to an email.
pub struct ReportAttachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ReportMailer: Send + Sync {
    async fn send_report(
        &self,
        to: &str,
        user_name: &str,
        download_url: &str,
        attachment: ReportAttachment,
    ) -> anyhow::Result<()>;
}

/// Resend (resend.com) transport. Without an API key it logs what it would
/// have sent and reports success, so local environments exercise the full
/// delivery path.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: Option<String>,
    from: String,
    base_url: String,
}

const DEFAULT_BASE_URL: &str = "https://api.resend.com";

#[derive(Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: String,
    attachments: Vec<EmailAttachment>,
}

#[derive(Serialize)]
struct EmailAttachment {
    filename: String,
    content: String,
}

impl ResendMailer {
    pub fn new(api_key: Option<String>, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            from,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn email_body(user_name: &str, download_url: &str) -> String {
        format!(
            r#"<div style="font-family: system-ui, sans-serif; max-width: 600px; margin: 0 auto; padding: 32px 24px; color: #1e293b;">
  <h1 style="font-size: 24px; font-weight: 700; margin-bottom: 8px; color: #0f172a;">
    Your AI Life Audit Report is Ready
  </h1>
  <p style="color: #475569; margin-bottom: 24px;">Hi {user_name},</p>
  <p style="color: #334155; line-height: 1.6; margin-bottom: 16px;">
    Your personalized AI automation roadmap is ready. We've analyzed all 9 domains of your life and identified
    your highest-leverage automation opportunities, ranked by impact and ease of implementation.
  </p>
  <p style="color: #334155; line-height: 1.6; margin-bottom: 24px;">
    Your report is attached to this email. You can also download it anytime from the link below.
  </p>
  <a href="{download_url}"
     style="display: inline-block; background: #06b6d4; color: white; text-decoration: none;
            padding: 12px 24px; border-radius: 8px; font-weight: 600; font-size: 14px;">
    Download Report
  </a>
  <hr style="margin: 32px 0; border: none; border-top: 1px solid #e2e8f0;" />
  <p style="font-size: 12px; color: #94a3b8;">
    LifeAudit AI · Your personal automation strategist
  </p>
</div>"#
        )
    }
}

#[async_trait]
impl ReportMailer for ResendMailer {
    #[instrument(name = "email.send_report", skip(self, attachment), fields(to = %to))]
    async fn send_report(
        &self,
        to: &str,
        user_name: &str,
        download_url: &str,
        attachment: ReportAttachment,
    ) -> anyhow::Result<()> {
        let Some(api_key) = &self.api_key else {
            tracing::info!(
                to,
                filename = %attachment.filename,
                "RESEND_API_KEY not set, skipping delivery"
            );
            return Ok(());
        };

        let body = SendEmailRequest {
            from: &self.from,
            to: [to],
            subject: "Your AI Life Audit Report is ready",
            html: Self::email_body(user_name, download_url),
            attachments: vec![EmailAttachment {
                filename: attachment.filename,
                content: base64::engine::general_purpose::STANDARD.encode(&attachment.bytes),
            }],
        };

        let response = self
            .client
            .post(format!("{}/emails", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&detail)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(detail);
            anyhow::bail!("Email provider returned {status}: {message}");
        }

        tracing::info!(to, "Report email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_api_key_is_dry_run_success() {
        let mailer = ResendMailer::new(None, "Audit <reports@example.com>".to_string());
        let result = mailer
            .send_report(
                "user@example.com",
                "Ada",
                "http://localhost:3000/api/report/abc/pdf",
                ReportAttachment {
                    filename: "report.txt".to_string(),
                    bytes: b"hello".to_vec(),
                },
            )
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_send_fails_against_unreachable_endpoint() {
        let mailer = ResendMailer::new(
            Some("re_test_key".to_string()),
            "Audit <reports@example.com>".to_string(),
        )
        .with_base_url("http://127.0.0.1:1".to_string());

        let result = mailer
            .send_report(
                "user@example.com",
                "Ada",
                "http://localhost:3000/api/report/abc/pdf",
                ReportAttachment {
                    filename: "report.txt".to_string(),
                    bytes: b"hello".to_vec(),
                },
            )
            .await;
        assert!(result.is_err());
    }

    #[test]
    fn test_email_body_interpolates_name_and_link() {
        let html = ResendMailer::email_body("Ada", "https://example.com/dl");
        assert!(html.contains("Hi Ada,"));
        assert!(html.contains(r#"href="https://example.com/dl""#));
    }
}
