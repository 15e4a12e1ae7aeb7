// Prompt constants for the four section-writing stages.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Stage 1 system prompt: evidence analyst, JSON only.
pub const RESEARCH_SYSTEM: &str = "You are a software engineering analyst who reads repository \
    activity and identifies concrete, evidence-backed achievements of one contributor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Stage 1 prompt. Replace `{person}` and `{signals}` before sending.
pub const RESEARCH_PROMPT_TEMPLATE: &str = r#"Identify the most significant achievements of {person} in the repository signals below.

Look for:
- architecture and design work (redesigns, migrations, new abstractions)
- performance work (latency, throughput, caching, concurrency)
- reliability and security work (bug fixes, validation, tests, hardening)
- feature delivery (endpoints, components, user-facing behaviour)
- infrastructure, tooling and code quality improvements

Use the commit patterns, impact signals, ownership map, hot files and pull requests as
evidence. Estimates are allowed when they follow from the size of the change; label them
as estimates in `metric_guess`.

Return a JSON object with this EXACT schema:
{
  "achievements": [
    {
      "title": "Outcome-focused title",
      "evidence": "What in the signals supports this",
      "metric_guess": "Quantified impact estimate",
      "files": ["src/cache.rs"],
      "time_window": "2024-03-01 to 2024-03-07",
      "area": "performance",
      "commits": ["0123456789"],
      "complexity_score": 7,
      "impact_scope": "team | service | organization"
    }
  ]
}

REPOSITORY SIGNALS:
{signals}"#;

/// Stage 2 prompt. Replace `{person}`, `{count}` and `{achievements}` before sending.
pub const ATTRIBUTION_PROMPT_TEMPLATE: &str = r#"Validate and rank the achievements below for {person}.

For each achievement judge:
- authorship confidence: High when commits or PRs are clearly authored by {person},
  Medium for shared work, Low when attribution is unclear
- impact: system-wide and architectural work ranks above features, which rank above
  isolated fixes
- evidence quality: several commits and concrete file changes beat a single mention

Drop anything whose authorship cannot be established or whose metrics look invented.
Prefer a mix of areas over several achievements of the same kind.

Return EXACTLY {count} achievements as a JSON object with this schema:
{
  "validated_achievements": [
    {
      "title": "Outcome-focused title",
      "impact": "Technical or business impact",
      "metrics": "Realistic measurements",
      "confidence": "High | Medium | Low",
      "proof_snippets": ["commit subject or file path backing the claim"],
      "ranking_score": 85
    }
  ]
}

ACHIEVEMENTS:
{achievements}"#;

/// Stage 3 system prompt: section writer, Markdown only.
pub const SYNTHESIS_SYSTEM: &str = "You are a CV editor for senior engineers. \
    You write Markdown sections only, with no preamble and no closing remarks.";

/// Stage 3 prompt. Replace `{count}`, `{template}` and `{achievements}` before sending.
pub const SYNTHESIS_PROMPT_TEMPLATE: &str = r#"Turn the validated achievements below into exactly {count} CV sections.

Every section MUST follow this template exactly:

{template}

Rules:
- titles start with a strong action verb (Architected, Optimized, Implemented, Led, Designed)
- the bullet point leads with the outcome and its key metric
- the description covers the technical problem, the approach and the measurable result
- active voice, no first person, British English
- no lists, no dashes at line start, no links or URLs
- no vague verbs such as "helped", "assisted" or "worked on"

VALIDATED ACHIEVEMENTS:
{achievements}"#;

/// Stage 4 system prompt.
pub const EDITING_SYSTEM: &str = "You are a meticulous CV editor. \
    Return only the polished Markdown sections, with no commentary.";

/// Stage 4 prompt. Replace `{style_guide}`, `{template}` and `{sections}` before sending.
pub const EDITING_PROMPT_TEMPLATE: &str = r#"Polish the CV sections below.

{style_guide}

Check every section:
- it follows the template exactly:
{template}
- the title is outcome-focused and opens with a strong verb
- the bullet point is a single sentence ending with <br />
- metrics are specific and plausible
- the language is active and confident
- no links, lists or stray formatting remain

SECTIONS:
{sections}"#;

pub const SENIOR_TECHNICAL_LEAD_GUIDE: &str = "\
STYLE: senior technical lead
- emphasise architectural decisions and system-level thinking
- give two or three sections to scalability or reliability work
- give one section to leadership, reviews or mentoring when the evidence allows
- balance hands-on engineering with strategic impact
- express metrics at team or organisation level";

pub const SIMPLE_GUIDE: &str = "\
STYLE: simple
- keep descriptions to two or three sentences
- keep only the most telling metric
- use plain language
- focus on concrete deliverables";

/// Style guide for the editing stage; unknown styles fall back to the senior lead guide.
pub fn style_guide(style: &str) -> &'static str {
    match style {
        "simple" => SIMPLE_GUIDE,
        _ => SENIOR_TECHNICAL_LEAD_GUIDE,
    }
}
