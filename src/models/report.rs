//! Report rows and the canonical `ReportData` shape.
//!
//! Field names serialize in the camelCase form the generation service is
//! instructed to produce; stored blobs and API payloads share that shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AuditReport {
    pub id: Uuid,
    pub session_id: Uuid,
    pub automation_map: serde_json::Value,
    pub impl_guide: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub emailed_at: Option<DateTime<Utc>>,
    pub pdf_path: Option<String>,
}

/// Report joined with its owning session's user, for reader-facing routes.
#[derive(Debug, Clone, FromRow)]
pub struct ReportWithOwner {
    pub id: Uuid,
    pub session_id: Uuid,
    pub automation_map: serde_json::Value,
    pub impl_guide: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub emailed_at: Option<DateTime<Utc>>,
    pub pdf_path: Option<String>,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AutomationOpportunity {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub opportunity: String,
    #[serde(default, rename = "timeSaved")]
    pub time_saved: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub cost: String,
    #[serde(default)]
    pub impact: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DomainAutomation {
    #[serde(default)]
    pub domain: String,
    #[serde(default, rename = "domainNumber")]
    pub domain_number: i32,
    #[serde(default)]
    pub opportunities: Vec<AutomationOpportunity>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QuickWin {
    #[serde(default)]
    pub rank: i32,
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "timeSaved")]
    pub time_saved: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImplementationAutomation {
    #[serde(default)]
    pub what: String,
    #[serde(default)]
    pub why: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, rename = "proTip")]
    pub pro_tip: String,
    #[serde(default, rename = "setupTime")]
    pub setup_time: String,
    #[serde(default)]
    pub maintenance: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImplementationGuide {
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub automations: Vec<ImplementationAutomation>,
}

/// The four-phase rollout schedule. Key names are part of the stored shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImplementationOrder {
    #[serde(default)]
    pub week1_2: Vec<String>,
    #[serde(default)]
    pub week3_4: Vec<String>,
    #[serde(default)]
    pub month2: Vec<String>,
    #[serde(default)]
    pub month3plus: Vec<String>,
}

/// The reconciled, canonical view every reader consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ReportData {
    #[serde(default)]
    pub summary: String,
    #[serde(default, rename = "automationMap")]
    pub automation_map: Vec<DomainAutomation>,
    #[serde(default, rename = "topQuickWins")]
    pub top_quick_wins: Vec<QuickWin>,
    #[serde(default, rename = "implementationGuide")]
    pub implementation_guide: Vec<ImplementationGuide>,
    #[serde(default, rename = "implementationOrder")]
    pub implementation_order: ImplementationOrder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_data_camel_case_field_names() {
        let data = ReportData {
            summary: "s".into(),
            ..Default::default()
        };
        let value = serde_json::to_value(&data).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("automationMap"));
        assert!(obj.contains_key("topQuickWins"));
        assert!(obj.contains_key("implementationGuide"));
        assert!(obj.contains_key("implementationOrder"));
    }

    #[test]
    fn test_implementation_order_key_names() {
        let value = serde_json::to_value(ImplementationOrder::default()).unwrap();
        let obj = value.as_object().unwrap();
        for key in ["week1_2", "week3_4", "month2", "month3plus"] {
            assert!(obj.contains_key(key), "missing {key}");
        }
    }

    #[test]
    fn test_opportunity_decodes_generated_shape() {
        let opportunity: AutomationOpportunity = serde_json::from_value(json!({
            "task": "Weekly status report",
            "opportunity": "Draft it from your project tracker",
            "timeSaved": "2 hrs/week",
            "difficulty": "Easy",
            "cost": "Free",
            "impact": "High"
        }))
        .unwrap();
        assert_eq!(opportunity.time_saved, "2 hrs/week");
        assert_eq!(opportunity.impact, "High");
    }

    #[test]
    fn test_missing_fields_default() {
        let guide: ImplementationGuide =
            serde_json::from_value(json!({"domain": "Personal Finance"})).unwrap();
        assert!(guide.automations.is_empty());

        let data: ReportData = serde_json::from_value(json!({})).unwrap();
        assert_eq!(data.summary, "");
        assert!(data.implementation_order.week1_2.is_empty());
    }
}
