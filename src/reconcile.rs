//! Report reconciliation.
//!
//! A report is stored as two independently-evolvable blobs: the full
//! generated structure (`automation_map`) and a redundant copy of the
//! implementation guide (`impl_guide`). Readers never touch the blobs
//! directly; this module merges them into one total [`ReportData`] view so a
//! missing, malformed, or legacy-shaped blob degrades to empty sections
//! instead of a failed read.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{DomainAutomation, ImplementationGuide, ImplementationOrder, QuickWin, ReportData};

/// Decode `blob[field]`, treating absence or a shape mismatch as `None`.
fn field<T: DeserializeOwned>(blob: &Value, name: &str) -> Option<T> {
    let value = blob.get(name)?;
    if value.is_null() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// Decode the blob itself as `T`, for legacy blobs stored as a bare array.
fn whole<T: DeserializeOwned>(blob: &Value) -> Option<T> {
    if blob.is_array() {
        serde_json::from_value(blob.clone()).ok()
    } else {
        None
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// Merge the two stored blobs into the canonical view. Total: every parse
/// failure is treated as an empty blob, never propagated.
pub fn reconcile(full_artifact: &Value, guide_subset: &Value) -> ReportData {
    let summary = non_empty(field(full_artifact, "summary"))
        .or_else(|| non_empty(field(guide_subset, "summary")))
        .unwrap_or_default();

    let automation_map: Vec<DomainAutomation> = field(full_artifact, "automationMap")
        .or_else(|| whole(full_artifact))
        .unwrap_or_default();

    let top_quick_wins: Vec<QuickWin> = field(full_artifact, "topQuickWins")
        .or_else(|| field(guide_subset, "topQuickWins"))
        .unwrap_or_default();

    let implementation_guide: Vec<ImplementationGuide> = field(guide_subset, "implementationGuide")
        .or_else(|| field(full_artifact, "implementationGuide"))
        .or_else(|| whole(guide_subset))
        .unwrap_or_default();

    let implementation_order: ImplementationOrder = field(full_artifact, "implementationOrder")
        .or_else(|| field(guide_subset, "implementationOrder"))
        .unwrap_or_default();

    ReportData {
        summary,
        automation_map,
        top_quick_wins,
        implementation_guide,
        implementation_order,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_prefers_full_artifact() {
        let full = json!({"summary": "A"});
        let guide = json!({"summary": "B"});
        assert_eq!(reconcile(&full, &guide).summary, "A");
    }

    #[test]
    fn test_summary_falls_back_to_guide() {
        let full = json!({});
        let guide = json!({"summary": "B"});
        assert_eq!(reconcile(&full, &guide).summary, "B");
    }

    #[test]
    fn test_summary_empty_when_both_empty() {
        assert_eq!(reconcile(&json!({}), &json!({})).summary, "");
    }

    #[test]
    fn test_empty_string_summary_falls_through() {
        let full = json!({"summary": ""});
        let guide = json!({"summary": "B"});
        assert_eq!(reconcile(&full, &guide).summary, "B");
    }

    #[test]
    fn test_legacy_bare_array_full_artifact_is_the_map() {
        let full = json!([
            {"domain": "Personal Finance", "domainNumber": 3, "opportunities": []}
        ]);
        let data = reconcile(&full, &json!({}));
        assert_eq!(data.automation_map.len(), 1);
        assert_eq!(data.automation_map[0].domain_number, 3);
    }

    #[test]
    fn test_legacy_bare_array_guide_subset_is_the_guide() {
        let guide = json!([
            {"domain": "Health & Fitness", "automations": []}
        ]);
        let data = reconcile(&json!({}), &guide);
        assert_eq!(data.implementation_guide.len(), 1);
        assert_eq!(data.implementation_guide[0].domain, "Health & Fitness");
    }

    #[test]
    fn test_guide_subset_preferred_for_implementation_guide() {
        let full = json!({"implementationGuide": [{"domain": "from-full"}]});
        let guide = json!({"implementationGuide": [{"domain": "from-guide"}]});
        let data = reconcile(&full, &guide);
        assert_eq!(data.implementation_guide[0].domain, "from-guide");
    }

    #[test]
    fn test_implementation_guide_falls_back_to_full() {
        let full = json!({"implementationGuide": [{"domain": "from-full"}]});
        let data = reconcile(&full, &json!({}));
        assert_eq!(data.implementation_guide[0].domain, "from-full");
    }

    #[test]
    fn test_quick_wins_precedence() {
        let full = json!({"topQuickWins": [{"rank": 1, "task": "full-win"}]});
        let guide = json!({"topQuickWins": [{"rank": 1, "task": "guide-win"}]});
        assert_eq!(reconcile(&full, &guide).top_quick_wins[0].task, "full-win");

        let data = reconcile(&json!({}), &guide);
        assert_eq!(data.top_quick_wins[0].task, "guide-win");
    }

    #[test]
    fn test_malformed_sections_degrade_to_empty() {
        let full = json!({
            "summary": 42,
            "automationMap": "not an array",
            "topQuickWins": {"rank": 1},
            "implementationOrder": []
        });
        let data = reconcile(&full, &json!("just a string"));
        assert_eq!(data.summary, "");
        assert!(data.automation_map.is_empty());
        assert!(data.top_quick_wins.is_empty());
        assert!(data.implementation_guide.is_empty());
        assert_eq!(data.implementation_order, ImplementationOrder::default());
    }

    #[test]
    fn test_missing_order_yields_four_empty_phases() {
        let order = reconcile(&json!({}), &json!({})).implementation_order;
        assert!(order.week1_2.is_empty());
        assert!(order.week3_4.is_empty());
        assert!(order.month2.is_empty());
        assert!(order.month3plus.is_empty());
    }

    #[test]
    fn test_full_round_trip_through_stored_shape() {
        let stored = json!({
            "summary": "Plenty of low-hanging fruit.",
            "automationMap": [
                {"domain": "Primary Work / Career", "domainNumber": 1, "opportunities": [
                    {"task": "Inbox triage", "opportunity": "Auto-label and draft",
                     "timeSaved": "3 hrs/week", "difficulty": "Easy", "cost": "Free", "impact": "High"}
                ]}
            ],
            "topQuickWins": [
                {"rank": 1, "task": "Inbox triage", "description": "Biggest win", "timeSaved": "3 hrs/week"}
            ],
            "implementationGuide": [],
            "implementationOrder": {"week1_2": ["Inbox triage"], "week3_4": [], "month2": [], "month3plus": []}
        });
        let guide = json!({"implementationGuide": [
            {"domain": "Primary Work / Career", "automations": []}
        ]});

        let data = reconcile(&stored, &guide);
        assert_eq!(data.summary, "Plenty of low-hanging fruit.");
        assert_eq!(data.automation_map[0].opportunities[0].time_saved, "3 hrs/week");
        assert_eq!(data.top_quick_wins[0].rank, 1);
        assert_eq!(data.implementation_guide.len(), 1);
        assert_eq!(data.implementation_order.week1_2, vec!["Inbox triage"]);
    }
}
