use serde::{Deserialize, Serialize};

use crate::models::PullRequestRecord;

/// PRs with more added lines than this count as large.
const LARGE_PR_ADDITIONS: u64 = 500;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrAnalysis {
    pub total_authored: usize,
    pub merged_count: usize,
    pub avg_additions: f64,
    pub avg_deletions: f64,
    pub large_prs: usize,
}

/// Aggregates the PRs authored by any of `aliases`. Averages fall back to 0
/// when nothing was authored.
pub fn analyze_pr_patterns(prs: &[PullRequestRecord], aliases: &[String]) -> PrAnalysis {
    let authored: Vec<&PullRequestRecord> = prs
        .iter()
        .filter(|pr| {
            pr.user
                .as_deref()
                .map(|user| aliases.iter().any(|a| a == user))
                .unwrap_or(false)
        })
        .collect();

    let divisor = authored.len().max(1) as f64;
    PrAnalysis {
        total_authored: authored.len(),
        merged_count: authored.iter().filter(|pr| pr.merged).count(),
        avg_additions: authored.iter().map(|pr| pr.additions).sum::<u64>() as f64 / divisor,
        avg_deletions: authored.iter().map(|pr| pr.deletions).sum::<u64>() as f64 / divisor,
        large_prs: authored
            .iter()
            .filter(|pr| pr.additions > LARGE_PR_ADDITIONS)
            .count(),
    }
}
