//! Agent pipeline — four sequential LLM stages that turn signals into sections.
//!
//! Flow: research (JSON achievements) → attribution (JSON, exactly N validated
//!       achievements) → synthesis (Markdown sections) → editing (style polish).
//!
//! Each stage sees only the previous stage's output, never the raw model
//! transcript. Any stage failure aborts the pipeline; the caller falls back.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::analysis::SignalPayload;
use crate::errors::AppError;
use crate::generation::prompts::{
    style_guide, ATTRIBUTION_PROMPT_TEMPLATE, EDITING_PROMPT_TEMPLATE, EDITING_SYSTEM,
    RESEARCH_PROMPT_TEMPLATE, RESEARCH_SYSTEM, SYNTHESIS_PROMPT_TEMPLATE, SYNTHESIS_SYSTEM,
};
use crate::generation::SectionWriter;
use crate::llm_client::prompts::{GROUNDING_INSTRUCTION, JSON_ONLY_SYSTEM, SECTION_TEMPLATE};
use crate::llm_client::LlmClient;

const STAGES: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Stage outputs
// ────────────────────────────────────────────────────────────────────────────

/// One achievement proposed by the research stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Achievement {
    pub title: String,
    pub evidence: String,
    pub metric_guess: String,
    pub files: Vec<String>,
    pub time_window: String,
    pub area: String,
    pub commits: Vec<String>,
    /// Model estimate, nominally 1–10.
    pub complexity_score: Option<f64>,
    pub impact_scope: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchFindings {
    pub achievements: Vec<Achievement>,
}

/// An achievement that survived attribution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatedAchievement {
    pub title: String,
    pub impact: String,
    pub metrics: String,
    pub confidence: String,
    pub proof_snippets: Vec<String>,
    pub ranking_score: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributionResult {
    pub validated_achievements: Vec<ValidatedAchievement>,
}

// ────────────────────────────────────────────────────────────────────────────
// Writer
// ────────────────────────────────────────────────────────────────────────────

pub struct AgentPipelineWriter {
    llm: LlmClient,
    person_name: String,
    bullets_count: usize,
    style: String,
}

impl AgentPipelineWriter {
    pub fn new(llm: LlmClient, person_name: String, bullets_count: usize, style: String) -> Self {
        Self {
            llm,
            person_name,
            bullets_count,
            style,
        }
    }

    async fn research(&self, payload: &SignalPayload) -> Result<ResearchFindings, AppError> {
        let prompt = build_research_prompt(&self.person_name, payload)?;
        let system = format!("{RESEARCH_SYSTEM}\n\n{GROUNDING_INSTRUCTION}");
        let findings: ResearchFindings = self.llm.call_json(&prompt, &system).await?;
        if findings.achievements.is_empty() {
            return Err(AppError::Validation(
                "Research stage found no achievements".to_string(),
            ));
        }
        Ok(findings)
    }

    async fn attribute(&self, findings: &ResearchFindings) -> Result<AttributionResult, AppError> {
        let prompt = build_attribution_prompt(&self.person_name, self.bullets_count, findings)?;
        let system = format!("{JSON_ONLY_SYSTEM}\n\n{GROUNDING_INSTRUCTION}");
        let result: AttributionResult = self.llm.call_json(&prompt, &system).await?;
        reconcile_count(result, self.bullets_count)
    }

    async fn synthesize(&self, attribution: &AttributionResult) -> Result<String, AppError> {
        let prompt = build_synthesis_prompt(self.bullets_count, attribution)?;
        Ok(self.llm.call_text(&prompt, SYNTHESIS_SYSTEM).await?)
    }

    async fn edit(&self, sections: &str) -> Result<String, AppError> {
        let prompt = build_editing_prompt(&self.style, sections);
        Ok(self.llm.call_text(&prompt, EDITING_SYSTEM).await?)
    }
}

#[async_trait]
impl SectionWriter for AgentPipelineWriter {
    fn name(&self) -> &'static str {
        "agent_pipeline"
    }

    async fn write_sections(&self, payload: &SignalPayload) -> Result<String, AppError> {
        info!("  (1/{STAGES}) Research: identifying achievements");
        let findings = self.research(payload).await?;
        debug!("Research produced {} achievements", findings.achievements.len());

        info!("  (2/{STAGES}) Attribution: validating and ranking");
        let attribution = self.attribute(&findings).await?;
        debug!(
            "Attribution kept {} achievements",
            attribution.validated_achievements.len()
        );

        info!("  (3/{STAGES}) Synthesis: writing sections");
        let draft = self.synthesize(&attribution).await?;

        info!("  (4/{STAGES}) Editing: applying '{}' style", self.style);
        self.edit(&draft).await
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

fn build_research_prompt(person: &str, payload: &SignalPayload) -> Result<String, AppError> {
    let signals = serde_json::to_string_pretty(payload)?;
    Ok(RESEARCH_PROMPT_TEMPLATE
        .replace("{person}", person)
        .replace("{signals}", &signals))
}

fn build_attribution_prompt(
    person: &str,
    count: usize,
    findings: &ResearchFindings,
) -> Result<String, AppError> {
    let achievements = serde_json::to_string_pretty(findings)?;
    Ok(ATTRIBUTION_PROMPT_TEMPLATE
        .replace("{person}", person)
        .replace("{count}", &count.to_string())
        .replace("{achievements}", &achievements))
}

fn build_synthesis_prompt(count: usize, attribution: &AttributionResult) -> Result<String, AppError> {
    let achievements = serde_json::to_string_pretty(attribution)?;
    Ok(SYNTHESIS_PROMPT_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{template}", SECTION_TEMPLATE)
        .replace("{achievements}", &achievements))
}

fn build_editing_prompt(style: &str, sections: &str) -> String {
    EDITING_PROMPT_TEMPLATE
        .replace("{style_guide}", style_guide(style))
        .replace("{template}", SECTION_TEMPLATE)
        .replace("{sections}", sections)
}

/// Trims attribution output to `count` achievements. Fewer is tolerated with a
/// warning; none at all fails the pipeline.
fn reconcile_count(mut result: AttributionResult, count: usize) -> Result<AttributionResult, AppError> {
    let got = result.validated_achievements.len();
    if got == 0 {
        return Err(AppError::Validation(
            "Attribution stage validated no achievements".to_string(),
        ));
    }
    if got < count {
        warn!("Attribution returned {got} achievements, expected {count}");
    }
    result.validated_achievements.truncate(count);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validated(n: usize) -> AttributionResult {
        AttributionResult {
            validated_achievements: (0..n)
                .map(|i| ValidatedAchievement {
                    title: format!("Achievement {i}"),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn test_findings_tolerate_missing_fields() {
        let findings: ResearchFindings = serde_json::from_value(json!({
            "achievements": [{"title": "Cut latency", "complexity_score": 7}]
        }))
        .unwrap();
        assert_eq!(findings.achievements[0].title, "Cut latency");
        assert_eq!(findings.achievements[0].complexity_score, Some(7.0));
        assert!(findings.achievements[0].files.is_empty());
    }

    #[test]
    fn test_reconcile_truncates_to_requested_count() {
        let result = reconcile_count(validated(5), 3).unwrap();
        assert_eq!(result.validated_achievements.len(), 3);
        assert_eq!(result.validated_achievements[2].title, "Achievement 2");
    }

    #[test]
    fn test_reconcile_tolerates_short_but_not_empty() {
        assert_eq!(
            reconcile_count(validated(2), 3).unwrap().validated_achievements.len(),
            2
        );
        assert!(matches!(
            reconcile_count(validated(0), 3),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_prompts_fill_every_placeholder() {
        let findings = ResearchFindings {
            achievements: vec![Achievement {
                title: "Cut latency".to_string(),
                ..Default::default()
            }],
        };
        let attribution = build_attribution_prompt("Ada", 4, &findings).unwrap();
        assert!(attribution.contains("EXACTLY 4 achievements"));
        assert!(attribution.contains("Cut latency"));
        assert!(!attribution.contains("{person}"));

        let synthesis = build_synthesis_prompt(4, &validated(1)).unwrap();
        assert!(synthesis.contains("**Bullet Point:**"));
        assert!(!synthesis.contains("{template}"));

        let editing = build_editing_prompt("simple", "## A");
        assert!(editing.contains("STYLE: simple"));
        assert!(editing.ends_with("## A"));
    }

    #[test]
    fn test_unknown_style_uses_senior_lead_guide() {
        assert!(build_editing_prompt("whatever", "").contains("STYLE: senior technical lead"));
    }
}
