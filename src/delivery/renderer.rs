//! Document rendering collaborator.
//!
//! The pipeline only hands the reconciled [`ReportData`] across this seam;
//! typesetting is not its concern. The bundled renderer produces a plain
//! readable document so the download route works without a typesetting
//! service attached.

use crate::models::ReportData;

pub struct RenderContext<'a> {
    pub user_name: &'a str,
    pub generated_at: String,
}

pub trait DocumentRenderer: Send + Sync {
    fn render(&self, ctx: &RenderContext<'_>, data: &ReportData) -> anyhow::Result<Vec<u8>>;
    fn content_type(&self) -> &'static str;
    fn file_extension(&self) -> &'static str;
}

pub struct TextDocumentRenderer;

impl DocumentRenderer for TextDocumentRenderer {
    fn render(&self, ctx: &RenderContext<'_>, data: &ReportData) -> anyhow::Result<Vec<u8>> {
        let mut out = String::new();

        out.push_str("AI AUTOMATION AUDIT REPORT\n");
        out.push_str(&format!("Prepared for {}\n", ctx.user_name));
        out.push_str(&format!("Generated {}\n\n", ctx.generated_at));

        if !data.summary.is_empty() {
            out.push_str("SUMMARY\n");
            out.push_str(&data.summary);
            out.push_str("\n\n");
        }

        if !data.top_quick_wins.is_empty() {
            out.push_str("TOP QUICK WINS\n");
            for win in &data.top_quick_wins {
                out.push_str(&format!(
                    "  {}. {} — {} ({})\n",
                    win.rank, win.task, win.description, win.time_saved
                ));
            }
            out.push('\n');
        }

        for entry in &data.automation_map {
            out.push_str(&format!("DOMAIN {}: {}\n", entry.domain_number, entry.domain));
            for opp in &entry.opportunities {
                out.push_str(&format!(
                    "  - {}: {} [saves {}, {}, cost {}, impact {}]\n",
                    opp.task, opp.opportunity, opp.time_saved, opp.difficulty, opp.cost, opp.impact
                ));
            }
            out.push('\n');
        }

        for guide in &data.implementation_guide {
            out.push_str(&format!("IMPLEMENTATION GUIDE: {}\n", guide.domain));
            for automation in &guide.automations {
                out.push_str(&format!("  {} — {}\n", automation.what, automation.why));
                for (i, step) in automation.steps.iter().enumerate() {
                    out.push_str(&format!("    {}. {}\n", i + 1, step));
                }
                if !automation.pro_tip.is_empty() {
                    out.push_str(&format!("    Tip: {}\n", automation.pro_tip));
                }
            }
            out.push('\n');
        }

        let order = &data.implementation_order;
        out.push_str("IMPLEMENTATION ORDER\n");
        for (label, phase) in [
            ("Weeks 1-2", &order.week1_2),
            ("Weeks 3-4", &order.week3_4),
            ("Month 2", &order.month2),
            ("Month 3+", &order.month3plus),
        ] {
            out.push_str(&format!("  {label}:\n"));
            for item in phase {
                out.push_str(&format!("    - {item}\n"));
            }
        }

        Ok(out.into_bytes())
    }

    fn content_type(&self) -> &'static str {
        "text/plain; charset=utf-8"
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::QuickWin;

    #[test]
    fn test_render_includes_sections() {
        let data = ReportData {
            summary: "A short profile.".into(),
            top_quick_wins: vec![QuickWin {
                rank: 1,
                task: "Inbox triage".into(),
                description: "Auto-label".into(),
                time_saved: "3 hrs/week".into(),
            }],
            ..Default::default()
        };
        let ctx = RenderContext {
            user_name: "Ada",
            generated_at: "August 27, 2026".into(),
        };

        let bytes = TextDocumentRenderer.render(&ctx, &data).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.contains("Prepared for Ada"));
        assert!(text.contains("A short profile."));
        assert!(text.contains("1. Inbox triage"));
        assert!(text.contains("IMPLEMENTATION ORDER"));
    }

    #[test]
    fn test_render_empty_report_still_produces_document() {
        let ctx = RenderContext {
            user_name: "Ada",
            generated_at: "August 27, 2026".into(),
        };
        let bytes = TextDocumentRenderer.render(&ctx, &ReportData::default()).unwrap();
        assert!(!bytes.is_empty());
    }
}
