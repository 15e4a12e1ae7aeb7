//! Signal compilation — assembles every derived structure into one payload.
//!
//! The payload is what the section writers see, so every list is truncated to
//! keep the serialized size bounded.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::impact::{ImpactLevel, ImpactSignal, SignalType};
use crate::analysis::ownership::significant_ownership;
use crate::analysis::patterns::CommitPattern;
use crate::analysis::pr_analysis::PrAnalysis;
use crate::analysis::summary::ContributionSummary;
use crate::models::{Commit, IssueRecord, IssuesAndPrs, PullRequestRecord};

const MAX_COMMITS: usize = 200;
const MAX_TOP_FILES: usize = 30;
const MAX_PATTERNS: usize = 10;
const MAX_PATTERN_FILES: usize = 20;
const MAX_ISSUES: usize = 100;
const MAX_COMMIT_FILES: usize = 10;
const SHA_CHARS: usize = 10;
const SUBJECT_CHARS: usize = 140;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayloadMetadata {
    pub person_name: String,
    pub analysis_date: String,
    pub repo_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompactCommit {
    pub sha: String,
    pub msg: String,
    pub files: Vec<String>,
    pub insertions: u64,
    pub deletions: u64,
    pub date: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternDigest {
    pub theme: String,
    pub commit_count: usize,
    pub files_affected: Vec<String>,
    pub total_changes: u64,
    pub complexity_score: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalDigest {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub evidence: Vec<String>,
    pub estimated_impact: ImpactLevel,
    pub confidence: f64,
    pub files_count: usize,
    pub metrics_hints: Vec<String>,
}

/// The full evidence payload written to `signals.json` and handed to writers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPayload {
    pub metadata: PayloadMetadata,
    pub commits_you: Vec<CompactCommit>,
    pub summary_you: ContributionSummary,
    pub top_files_you: Vec<(String, usize)>,
    pub languages: BTreeMap<String, usize>,
    pub components: BTreeMap<String, Vec<String>>,
    pub commit_patterns: Vec<PatternDigest>,
    pub impact_signals: Vec<SignalDigest>,
    pub ownership_map: BTreeMap<String, f64>,
    pub pr_analysis: PrAnalysis,
    pub issues: Vec<IssueRecord>,
    pub prs: Vec<PullRequestRecord>,
}

/// Everything the compiler consumes, already derived by the analyzers.
pub struct SignalInputs<'a> {
    pub commits: &'a [Commit],
    pub summary: ContributionSummary,
    pub top_files: Vec<(String, usize)>,
    pub languages: BTreeMap<String, usize>,
    pub components: BTreeMap<String, Vec<String>>,
    pub patterns: &'a [CommitPattern],
    pub impact_signals: &'a [ImpactSignal],
    pub ownership: &'a BTreeMap<String, f64>,
    pub pr_analysis: PrAnalysis,
    pub issues_prs: &'a IssuesAndPrs,
}

pub fn compile_signals(inputs: SignalInputs<'_>, metadata: PayloadMetadata) -> SignalPayload {
    let skip = inputs.commits.len().saturating_sub(MAX_COMMITS);
    let commits_you = inputs.commits[skip..].iter().map(compact_commit).collect();

    let mut top_files = inputs.top_files;
    top_files.truncate(MAX_TOP_FILES);

    SignalPayload {
        metadata,
        commits_you,
        summary_you: inputs.summary,
        top_files_you: top_files,
        languages: inputs.languages,
        components: inputs.components,
        commit_patterns: inputs
            .patterns
            .iter()
            .take(MAX_PATTERNS)
            .map(|p| PatternDigest {
                theme: p.theme.clone(),
                commit_count: p.commits.len(),
                files_affected: p.files_affected.iter().take(MAX_PATTERN_FILES).cloned().collect(),
                total_changes: p.total_changes,
                complexity_score: p.complexity_score,
            })
            .collect(),
        impact_signals: inputs
            .impact_signals
            .iter()
            .map(|s| SignalDigest {
                signal_type: s.signal_type,
                evidence: s.evidence.clone(),
                estimated_impact: s.estimated_impact,
                confidence: s.confidence,
                files_count: s.files_involved.len(),
                metrics_hints: s.metrics_hints.clone(),
            })
            .collect(),
        ownership_map: significant_ownership(inputs.ownership),
        pr_analysis: inputs.pr_analysis,
        issues: inputs.issues_prs.issues.iter().take(MAX_ISSUES).cloned().collect(),
        prs: inputs.issues_prs.prs.iter().take(MAX_ISSUES).cloned().collect(),
    }
}

fn compact_commit(commit: &Commit) -> CompactCommit {
    CompactCommit {
        sha: commit.id.chars().take(SHA_CHARS).collect(),
        msg: commit.subject().chars().take(SUBJECT_CHARS).collect(),
        files: commit.files.iter().take(MAX_COMMIT_FILES).cloned().collect(),
        insertions: commit.insertions,
        deletions: commit.deletions,
        date: commit.timestamp.format("%Y-%m-%d").to_string(),
    }
}
