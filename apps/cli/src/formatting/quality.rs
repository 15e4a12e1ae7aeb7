//! Quality Assessor — heuristic scoring of finished sections.
//!
//! Four binary axes (metrics, technical terms, description length, active
//! voice) weighted 0.3 / 0.3 / 0.2 / 0.2. The document report aggregates the
//! per-section scores.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::formatting::autofix::{BULLET_LABEL, DESCRIPTION_LABEL};

const MIN_DESCRIPTION_WORDS: usize = 20;
const MAX_DESCRIPTION_WORDS: usize = 80;
const MIN_TECHNICAL_TERMS: usize = 2;
const MAX_PASSIVE_INDICATORS: usize = 1;
const LOW_QUALITY: f64 = 0.5;
const HIGH_QUALITY: f64 = 0.8;
const MAX_REPORT_SUGGESTIONS: usize = 5;

static METRIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+%",
        r"\d+x",
        r"\d+ms",
        r"\d+s",
        r"\d+\.\d+[a-z]*",
        r"\$\d+",
        r"\d+k\b",
        r"\d+m\b",
        r"\d+ (users?|files?|requests?|transactions?|errors?)",
    ]
    .iter()
    .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
    .collect()
});

/// Technical vocabulary by category, matched as lowercase substrings.
pub const TECHNICAL_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "architecture",
        &["microservices", "api", "rest", "graphql", "database", "cache", "queue"],
    ),
    (
        "performance",
        &["latency", "throughput", "optimization", "scaling", "load", "performance"],
    ),
    (
        "infrastructure",
        &["docker", "kubernetes", "aws", "azure", "gcp", "ci/cd", "deployment"],
    ),
    (
        "languages",
        &["python", "javascript", "typescript", "java", "go", "rust", "kotlin"],
    ),
    (
        "frameworks",
        &["react", "angular", "vue", "django", "flask", "spring", "express"],
    ),
    (
        "databases",
        &["postgresql", "mysql", "mongodb", "redis", "elasticsearch", "dynamodb"],
    ),
    (
        "tools",
        &["git", "jira", "jenkins", "terraform", "ansible", "prometheus", "grafana"],
    ),
];

const PASSIVE_INDICATORS: &[&str] = &["was", "were", "been", "being"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionQuality {
    pub has_metrics: bool,
    pub has_technical_terms: bool,
    pub appropriate_length: bool,
    pub active_voice: bool,
    pub score: f64,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub valid: bool,
    pub average_quality: f64,
    pub section_count: usize,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub quality_distribution: QualityDistribution,
}

/// A section as read back from a document; any part may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionDraft {
    pub title: Option<String>,
    pub bullet_point: Option<String>,
    pub description: Option<String>,
}

pub fn assess_section_quality(title: &str, bullet_point: &str, description: &str) -> SectionQuality {
    let full_text = format!("{title} {bullet_point} {description}").to_lowercase();

    let has_metrics = METRIC_PATTERNS.iter().any(|re| re.is_match(&full_text));

    let technical_terms = TECHNICAL_KEYWORDS
        .iter()
        .flat_map(|(_, terms)| terms.iter())
        .filter(|term| full_text.contains(*term))
        .count();
    let has_technical_terms = technical_terms >= MIN_TECHNICAL_TERMS;

    let description_words = description.split_whitespace().count();
    let appropriate_length =
        (MIN_DESCRIPTION_WORDS..=MAX_DESCRIPTION_WORDS).contains(&description_words);

    let passive_count = PASSIVE_INDICATORS
        .iter()
        .filter(|w| full_text.contains(*w))
        .count();
    let active_voice = passive_count <= MAX_PASSIVE_INDICATORS;

    let score = weight(has_metrics, 0.3)
        + weight(has_technical_terms, 0.3)
        + weight(appropriate_length, 0.2)
        + weight(active_voice, 0.2);

    let mut suggestions = Vec::new();
    if !has_metrics {
        suggestions.push("Add specific metrics (percentages, time improvements, scale)".to_string());
    }
    if !has_technical_terms {
        suggestions.push("Include more technical terminology and technologies".to_string());
    }
    if !appropriate_length {
        if description_words < MIN_DESCRIPTION_WORDS {
            suggestions.push("Expand description with more technical details".to_string());
        } else {
            suggestions.push("Condense description to focus on key achievements".to_string());
        }
    }
    if !active_voice {
        suggestions.push("Use more active voice constructions".to_string());
    }

    SectionQuality {
        has_metrics,
        has_technical_terms,
        appropriate_length,
        active_voice,
        score,
        suggestions,
    }
}

fn weight(flag: bool, weight: f64) -> f64 {
    if flag {
        weight
    } else {
        0.0
    }
}

/// Reads sections back out of a document by their line prefixes. Bullet
/// values keep any trailing `<br />`.
pub fn extract_sections(text: &str) -> Vec<SectionDraft> {
    let mut sections = Vec::new();
    let mut current: Option<SectionDraft> = None;

    for line in text.split('\n').map(str::trim) {
        if let Some(title) = line.strip_prefix("## ") {
            sections.extend(current.take());
            current = Some(SectionDraft {
                title: Some(title.trim().to_string()),
                ..Default::default()
            });
        } else if let Some(value) = line.strip_prefix(BULLET_LABEL) {
            current.get_or_insert_with(SectionDraft::default).bullet_point =
                Some(value.trim().to_string());
        } else if let Some(value) = line.strip_prefix(DESCRIPTION_LABEL) {
            current.get_or_insert_with(SectionDraft::default).description =
                Some(value.trim().to_string());
        }
    }
    sections.extend(current);
    sections
}

/// Scores every section of a normalized document and summarises the result.
pub fn validate_output_quality(text: &str) -> QualityReport {
    let sections = extract_sections(text);
    if sections.is_empty() {
        return QualityReport {
            valid: false,
            average_quality: 0.0,
            section_count: 0,
            issues: vec!["No valid sections found".to_string()],
            suggestions: vec!["Check section formatting".to_string()],
            quality_distribution: QualityDistribution::default(),
        };
    }

    let mut issues = Vec::new();
    let mut suggestions = Vec::new();
    let mut scores = Vec::new();

    for (i, section) in sections.iter().enumerate() {
        let i = i + 1;
        let parts = (
            non_empty(&section.title),
            non_empty(&section.bullet_point),
            non_empty(&section.description),
        );
        let (Some(title), Some(bullet), Some(description)) = parts else {
            issues.push(format!("Section {i}: Missing required components"));
            continue;
        };

        let quality = assess_section_quality(title, bullet, description);
        scores.push(quality.score);
        if quality.score < LOW_QUALITY {
            issues.push(format!(
                "Section {i} '{title}': Low quality score ({:.1})",
                quality.score
            ));
            suggestions.extend(quality.suggestions.iter().map(|s| format!("Section {i}: {s}")));
        }
    }

    let average_quality = if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    };
    suggestions.truncate(MAX_REPORT_SUGGESTIONS);

    QualityReport {
        valid: issues.is_empty(),
        average_quality,
        section_count: sections.len(),
        issues,
        suggestions,
        quality_distribution: QualityDistribution {
            high: scores.iter().filter(|&&s| s > HIGH_QUALITY).count(),
            medium: scores
                .iter()
                .filter(|&&s| (LOW_QUALITY..=HIGH_QUALITY).contains(&s))
                .count(),
            low: scores.iter().filter(|&&s| s < LOW_QUALITY).count(),
        },
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HIGH_TITLE: &str = "Optimized Database Performance";
    const HIGH_BULLET: &str =
        "Reduced query latency by 45% and improved throughput 3x through Redis caching <br />";
    const HIGH_DESCRIPTION: &str = "Implemented comprehensive database optimization using \
        PostgreSQL query optimization and Redis caching layer. The changes affected 12 critical \
        API endpoints and reduced P95 latency from 800ms to 440ms.";

    fn section(title: &str, bullet: &str, description: &str) -> String {
        format!("## {title}\n{BULLET_LABEL} {bullet}\n{DESCRIPTION_LABEL} {description}\n")
    }

    #[test]
    fn test_high_quality_section() {
        let q = assess_section_quality(HIGH_TITLE, HIGH_BULLET, HIGH_DESCRIPTION);
        assert!(q.has_metrics);
        assert!(q.has_technical_terms);
        assert!(q.appropriate_length);
        assert!(q.active_voice);
        assert!(q.score > 0.7, "score was {}", q.score);
    }

    #[test]
    fn test_low_quality_section() {
        let q = assess_section_quality(
            "Worked on stuff",
            "Did some programming work <br />",
            "Made changes to files.",
        );
        assert!(q.score < 0.3, "score was {}", q.score);
        assert!(!q.has_metrics && !q.has_technical_terms && !q.appropriate_length);
        for expected in [
            "Add specific metrics (percentages, time improvements, scale)",
            "Include more technical terminology and technologies",
            "Expand description with more technical details",
        ] {
            assert!(
                q.suggestions.contains(&expected.to_string()),
                "missing suggestion {expected:?}"
            );
        }
    }

    #[test]
    fn test_long_description_suggests_condensing() {
        let description = "word ".repeat(90);
        let q = assess_section_quality("T", "B", &description);
        assert!(!q.appropriate_length);
        assert!(q
            .suggestions
            .contains(&"Condense description to focus on key achievements".to_string()));
    }

    #[test]
    fn test_passive_voice_detection() {
        let q = assess_section_quality("T", "it was done", "changes were made and had been merged");
        assert!(!q.active_voice);
        assert!(q
            .suggestions
            .contains(&"Use more active voice constructions".to_string()));
    }

    #[test]
    fn test_extract_sections_keeps_line_breaks_in_bullets() {
        let doc = format!("# Repo\n\n{}", section("A", "b <br />", "d"));
        let sections = extract_sections(&doc);
        assert_eq!(
            sections,
            vec![SectionDraft {
                title: Some("A".to_string()),
                bullet_point: Some("b <br />".to_string()),
                description: Some("d".to_string()),
            }]
        );
    }

    #[test]
    fn test_report_for_mixed_document() {
        let doc = format!(
            "{}{}## Missing parts\n",
            section(HIGH_TITLE, HIGH_BULLET, HIGH_DESCRIPTION),
            section("Worked on stuff", "Did some programming work <br />", "Made changes to files.")
        );
        let report = validate_output_quality(&doc);
        assert!(!report.valid);
        assert_eq!(report.section_count, 3);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues[0].starts_with("Section 2 'Worked on stuff': Low quality score (0.2)"));
        assert_eq!(report.issues[1], "Section 3: Missing required components");
        assert!(report.suggestions.iter().all(|s| s.starts_with("Section 2: ")));
        assert_eq!(report.quality_distribution.high, 1);
        assert_eq!(report.quality_distribution.low, 1);
        assert!((report.average_quality - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_report_suggestions_capped_at_five() {
        let weak = section("x", "y", "z");
        let report = validate_output_quality(&weak.repeat(3));
        assert_eq!(report.suggestions.len(), 5);
    }

    #[test]
    fn test_report_without_sections() {
        let report = validate_output_quality("just prose");
        assert!(!report.valid);
        assert_eq!(report.issues, vec!["No valid sections found"]);
        assert_eq!(report.suggestions, vec!["Check section formatting"]);
        assert_eq!(report.section_count, 0);
        assert_eq!(report.average_quality, 0.0);
    }
}
