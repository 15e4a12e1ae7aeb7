//! Impact signal classification — keyword buckets over commit messages.
//!
//! Each bucket is evaluated on its own, so a single commit can feed several
//! signal types at once. Buckets with no matching commit produce no signal.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::Commit;

const MAX_EVIDENCE: usize = 5;
const EVIDENCE_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalType {
    Performance,
    Architecture,
    Reliability,
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImpactSignal {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub evidence: Vec<String>,
    pub estimated_impact: ImpactLevel,
    pub confidence: f64,
    pub files_involved: BTreeSet<String>,
    pub metrics_hints: Vec<String>,
}

/// Keyword buckets, matched as lowercase substrings of the commit message.
pub const IMPACT_BUCKETS: &[(SignalType, &[&str])] = &[
    (
        SignalType::Performance,
        &["optimize", "performance", "speed", "latency", "cache", "async", "parallel"],
    ),
    (
        SignalType::Architecture,
        &["refactor", "architecture", "design", "pattern", "structure", "migration"],
    ),
    (
        SignalType::Reliability,
        &["fix", "bug", "error", "exception", "test", "security", "validation"],
    ),
    (
        SignalType::Feature,
        &["add", "implement", "feature", "endpoint", "api", "ui", "component"],
    ),
];

/// Classifies commits into impact signals, one per bucket with at least one match,
/// in bucket order.
pub fn detect_impact_signals(commits: &[Commit]) -> Vec<ImpactSignal> {
    IMPACT_BUCKETS
        .iter()
        .filter_map(|(signal_type, keywords)| classify_bucket(*signal_type, keywords, commits))
        .collect()
}

fn classify_bucket(
    signal_type: SignalType,
    keywords: &[&str],
    commits: &[Commit],
) -> Option<ImpactSignal> {
    let matching: Vec<&Commit> = commits
        .iter()
        .filter(|c| {
            let message = c.message.to_lowercase();
            keywords.iter().any(|kw| message.contains(kw))
        })
        .collect();

    if matching.is_empty() {
        return None;
    }

    let files_involved: BTreeSet<String> = matching
        .iter()
        .flat_map(|c| c.files.iter().cloned())
        .collect();
    let total_changes: u64 = matching.iter().map(|c| c.total_changes()).sum();
    let files_count = files_involved.len() as u64;

    let confidence =
        (matching.len() as f64 / 10.0 + total_changes as f64 / 1000.0).min(1.0);

    Some(ImpactSignal {
        signal_type,
        evidence: matching
            .iter()
            .take(MAX_EVIDENCE)
            .map(|c| c.message.chars().take(EVIDENCE_CHARS).collect())
            .collect(),
        estimated_impact: estimate_impact_level(total_changes, files_count),
        confidence,
        files_involved,
        metrics_hints: metrics_hints(signal_type, total_changes, files_count),
    })
}

pub fn estimate_impact_level(total_changes: u64, files_count: u64) -> ImpactLevel {
    if total_changes > 1000 || files_count > 10 {
        ImpactLevel::High
    } else if total_changes > 200 || files_count > 3 {
        ImpactLevel::Medium
    } else {
        ImpactLevel::Low
    }
}

/// Rough, templated metric estimates handed to the writers as hints.
pub fn metrics_hints(signal_type: SignalType, changes: u64, files: u64) -> Vec<String> {
    match signal_type {
        SignalType::Performance => vec![
            format!("~{}% latency reduction estimate", (changes / 20).min(50)),
            format!("~{}x throughput improvement potential", files.min(3)),
        ],
        SignalType::Reliability => vec![
            format!("~{}% error reduction estimate", (changes / 10).min(90)),
            format!("Affected {files} critical modules"),
        ],
        SignalType::Architecture => vec![
            format!("Refactored {files} components"),
            format!("~{changes} lines of architectural changes"),
        ],
        SignalType::Feature => vec![
            format!("Delivered {files} new components"),
            format!("~{changes} lines of feature code"),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commit::fixtures::commit;

    #[test]
    fn test_null_pointer_fix_is_single_reliability_signal() {
        let commits = vec![commit(
            "a",
            0,
            "Fix null pointer exception in auth module",
            &["auth/session.rs"],
            120,
        )];
        let signals = detect_impact_signals(&commits);
        assert_eq!(signals.len(), 1);
        let s = &signals[0];
        assert_eq!(s.signal_type, SignalType::Reliability);
        let expected = (1.0_f64 / 10.0 + 120.0 / 1000.0).min(1.0);
        assert!((s.confidence - expected).abs() < 1e-9, "confidence was {}", s.confidence);
        assert_eq!(s.estimated_impact, ImpactLevel::Low);
        assert_eq!(s.evidence, vec!["Fix null pointer exception in auth module"]);
    }

    #[test]
    fn test_buckets_fan_out_independently() {
        // "optimize" → performance, "api" → feature, "fix" → reliability
        let commits = vec![commit("a", 0, "optimize api fix", &["a.rs"], 10)];
        let types: Vec<_> = detect_impact_signals(&commits)
            .into_iter()
            .map(|s| s.signal_type)
            .collect();
        assert_eq!(
            types,
            vec![SignalType::Performance, SignalType::Reliability, SignalType::Feature]
        );
    }

    #[test]
    fn test_no_matches_no_signals() {
        let commits = vec![commit("a", 0, "bump version", &["Cargo.toml"], 2)];
        assert!(detect_impact_signals(&commits).is_empty());
        assert!(detect_impact_signals(&[]).is_empty());
    }

    #[test]
    fn test_confidence_is_capped_at_one() {
        let commits: Vec<_> = (0..12)
            .map(|i| commit(&format!("c{i}"), i, "refactor module", &["m.rs"], 200))
            .collect();
        let signals = detect_impact_signals(&commits);
        assert_eq!(signals[0].signal_type, SignalType::Architecture);
        assert_eq!(signals[0].confidence, 1.0);
    }

    #[test]
    fn test_evidence_limited_to_five_truncated_messages() {
        let long = format!("cache {}", "x".repeat(300));
        let commits: Vec<_> = (0..7)
            .map(|i| commit(&format!("c{i}"), i, &long, &["a.rs"], 1))
            .collect();
        let signals = detect_impact_signals(&commits);
        assert_eq!(signals[0].evidence.len(), 5);
        assert!(signals[0].evidence.iter().all(|e| e.chars().count() == 100));
    }

    #[test]
    fn test_impact_level_thresholds() {
        assert_eq!(estimate_impact_level(1001, 0), ImpactLevel::High);
        assert_eq!(estimate_impact_level(0, 11), ImpactLevel::High);
        assert_eq!(estimate_impact_level(201, 0), ImpactLevel::Medium);
        assert_eq!(estimate_impact_level(0, 4), ImpactLevel::Medium);
        assert_eq!(estimate_impact_level(200, 3), ImpactLevel::Low);
    }

    #[test]
    fn test_metric_hint_formulas() {
        assert_eq!(
            metrics_hints(SignalType::Performance, 2000, 7),
            vec![
                "~50% latency reduction estimate".to_string(),
                "~3x throughput improvement potential".to_string()
            ]
        );
        assert_eq!(
            metrics_hints(SignalType::Reliability, 450, 2),
            vec![
                "~45% error reduction estimate".to_string(),
                "Affected 2 critical modules".to_string()
            ]
        );
        assert_eq!(
            metrics_hints(SignalType::Feature, 812, 4)[1],
            "~812 lines of feature code"
        );
    }

    #[test]
    fn test_signal_serializes_with_type_key() {
        let commits = vec![commit("a", 0, "add endpoint", &["api.rs"], 5)];
        let value = serde_json::to_value(&detect_impact_signals(&commits)[0]).unwrap();
        assert_eq!(value["type"], "feature");
        assert_eq!(value["estimated_impact"], "Low");
    }
}
