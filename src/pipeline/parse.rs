//! Defensive parsing of the generation service's free-form text output.

use serde_json::Value;

use crate::models::ReportData;

/// Pull the JSON object out of the response text: a ```json fence wins, then
/// a bare fence holding an object, then the outermost brace pair, then the
/// text as-is.
pub fn extract_json(content: &str) -> String {
    if let Some(start) = content.find("```json")
        && let Some(end) = content[start + 7..].find("```")
    {
        return content[start + 7..start + 7 + end].trim().to_string();
    }
    if let Some(start) = content.find("```")
        && let Some(end) = content[start + 3..].find("```")
    {
        let inner = content[start + 3..start + 3 + end].trim();
        if inner.starts_with('{') {
            return inner.to_string();
        }
    }
    if let Some(start) = content.find('{')
        && let Some(end) = content.rfind('}')
        && start < end
    {
        return content[start..=end].to_string();
    }
    content.to_string()
}

/// Decode the generated report. An unparsable payload is an error, as is an
/// object with no `automationMap` at all (the core artifact); every other
/// missing section defaults to empty and is handled at read time by the
/// reconciler.
pub fn parse_report(content: &str) -> anyhow::Result<ReportData> {
    let json_str = extract_json(content);

    let value: Value = serde_json::from_str(&json_str)
        .map_err(|e| anyhow::anyhow!("generation output is not valid JSON: {e}"))?;

    if value.get("automationMap").is_none() {
        anyhow::bail!("generation output has no automationMap");
    }

    serde_json::from_value(value)
        .map_err(|e| anyhow::anyhow!("generation output does not match report schema: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{"summary": "ok", "automationMap": []}"#;

    #[test]
    fn test_extract_raw_object() {
        assert_eq!(extract_json(MINIMAL), MINIMAL);
    }

    #[test]
    fn test_extract_json_fence() {
        let content = format!("Here is your report:\n```json\n{MINIMAL}\n```\nEnjoy!");
        assert_eq!(extract_json(&content), MINIMAL);
    }

    #[test]
    fn test_extract_bare_fence() {
        let content = format!("```\n{MINIMAL}\n```");
        assert_eq!(extract_json(&content), MINIMAL);
    }

    #[test]
    fn test_extract_surrounding_prose() {
        let content = format!("Sure! {MINIMAL} Let me know if you need more.");
        assert_eq!(extract_json(&content), MINIMAL);
    }

    #[test]
    fn test_parse_minimal_report() {
        let data = parse_report(MINIMAL).unwrap();
        assert_eq!(data.summary, "ok");
        assert!(data.automation_map.is_empty());
        assert!(data.top_quick_wins.is_empty());
    }

    #[test]
    fn test_parse_fenced_report() {
        let content = format!("```json\n{MINIMAL}\n```");
        assert!(parse_report(&content).is_ok());
    }

    #[test]
    fn test_parse_full_report() {
        let content = r#"{
            "summary": "You have strong automation potential.",
            "automationMap": [
                {"domain": "Primary Work / Career", "domainNumber": 1, "opportunities": [
                    {"task": "Status reports", "opportunity": "Draft from tracker",
                     "timeSaved": "2 hrs/week", "difficulty": "Easy", "cost": "Free", "impact": "High"}
                ]}
            ],
            "topQuickWins": [{"rank": 1, "task": "Status reports", "description": "d", "timeSaved": "2 hrs/week"}],
            "implementationGuide": [{"domain": "Primary Work / Career", "automations": [
                {"what": "w", "why": "y", "tools": ["t"], "steps": ["s"], "proTip": "p",
                 "setupTime": "30 minutes", "maintenance": "none"}
            ]}],
            "implementationOrder": {"week1_2": ["a"], "week3_4": [], "month2": [], "month3plus": []}
        }"#;
        let data = parse_report(content).unwrap();
        assert_eq!(data.automation_map[0].opportunities.len(), 1);
        assert_eq!(data.implementation_guide[0].automations[0].setup_time, "30 minutes");
        assert_eq!(data.implementation_order.week1_2, vec!["a"]);
    }

    #[test]
    fn test_parse_rejects_non_json() {
        let result = parse_report("I'm sorry, I can't produce a report right now.");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_missing_automation_map() {
        let result = parse_report(r#"{"summary": "looks good"}"#);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("automationMap"));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let result = parse_report(r#"{"automationMap": "not an array"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_other_sections_default_when_absent() {
        let data = parse_report(r#"{"automationMap": []}"#).unwrap();
        assert_eq!(data.summary, "");
        assert!(data.implementation_guide.is_empty());
        assert!(data.implementation_order.month3plus.is_empty());
    }
}
