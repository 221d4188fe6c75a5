//! Prompt assembly for the one-shot generation call.

use crate::domains::domain_name;
use crate::models::AuditResponse;

/// Fixed system instruction: describes the exact JSON structure the service
/// must return. The parser in [`super::parse`] is the defensive counterpart.
pub const SYSTEM_PROMPT: &str = r#"You are a senior AI automation strategist. A user has just completed a 9-domain life audit questionnaire. Based on their answers, you must deliver:

1. AUTOMATION MAP: For every task/workflow mentioned, identify automation opportunities.
2. IMPLEMENTATION GUIDE: For each opportunity, provide actionable steps.

Return a valid JSON object with this exact structure:
{
  "summary": "2-3 sentence overview of the user's automation profile",
  "automationMap": [
    {
      "domain": "Domain name",
      "domainNumber": 1,
      "opportunities": [
        {
          "task": "Specific task",
          "opportunity": "What AI can do",
          "timeSaved": "X hrs/week",
          "difficulty": "Easy|Medium|Hard",
          "cost": "Free|Low|Medium|High",
          "impact": "Low|Medium|High|Transformative"
        }
      ]
    }
  ],
  "topQuickWins": [
    {
      "rank": 1,
      "task": "Task name",
      "description": "Brief description of the win",
      "timeSaved": "X hrs/week"
    }
  ],
  "implementationGuide": [
    {
      "domain": "Domain name",
      "automations": [
        {
          "what": "The specific task being automated",
          "why": "The benefit and time savings",
          "tools": ["Tool 1", "Tool 2"],
          "steps": ["Step 1", "Step 2", "Step 3"],
          "proTip": "One insider tip",
          "setupTime": "X minutes/hours",
          "maintenance": "Ongoing effort needed"
        }
      ]
    }
  ],
  "implementationOrder": {
    "week1_2": ["Quick win descriptions"],
    "week3_4": ["Next steps"],
    "month2": ["Medium complexity"],
    "month3plus": ["Advanced automations"]
  }
}

Be specific. Reference the user's actual tools and workflows. Never invent tools that don't exist. Always include at least one free option. Return only the JSON object with no additional text."#;

/// Render the collected responses as one labeled block per domain, ascending
/// by domain id. Domains without a response are simply omitted, so a partial
/// submission produces a partial prompt.
pub fn build_user_prompt(responses: &[AuditResponse]) -> String {
    let mut sorted: Vec<&AuditResponse> = responses.iter().collect();
    sorted.sort_by_key(|r| r.domain);

    let blocks: Vec<String> = sorted
        .iter()
        .map(|r| {
            let name = domain_name(r.domain).unwrap_or("Unknown");
            let answers =
                serde_json::to_string_pretty(&r.answers).unwrap_or_else(|_| r.answers.to_string());
            format!("## DOMAIN {}: {}\n{}", r.domain, name, answers)
        })
        .collect();

    format!(
        "Here are my 9-domain life audit answers. Please analyze them and provide my personalized automation roadmap:\n\n{}",
        blocks.join("\n\n")
    )
}
