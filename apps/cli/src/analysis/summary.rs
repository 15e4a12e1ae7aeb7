use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::commit::parent_dir;
use crate::models::Commit;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContributionSummary {
    pub total_commits: usize,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub net_lines: i64,
    pub files_touched_count: usize,
    pub directories_touched_count: usize,
    pub files_touched: Vec<String>,
    pub avg_commits_per_week: f64,
    pub largest_single_commit: u64,
}

/// Splits commits into (yours, others) by author name alias or email.
pub fn contributions_by_user(
    commits: Vec<Commit>,
    aliases: &[String],
    emails: &[String],
) -> (Vec<Commit>, Vec<Commit>) {
    commits.into_iter().partition(|c| {
        aliases.iter().any(|a| a == &c.author_name) || emails.iter().any(|e| e == &c.author_email)
    })
}

/// Aggregate activity numbers for a contributor's commits.
pub fn summarize_contributions(commits: &[Commit]) -> ContributionSummary {
    let total_insertions: u64 = commits.iter().map(|c| c.insertions).sum();
    let total_deletions: u64 = commits.iter().map(|c| c.deletions).sum();

    let mut files_touched = BTreeSet::new();
    let mut directories = BTreeSet::new();
    for file in commits.iter().flat_map(|c| &c.files) {
        files_touched.insert(file.clone());
        directories.insert(parent_dir(file));
    }

    let avg_commits_per_week = match (
        commits.iter().map(|c| c.timestamp).min(),
        commits.iter().map(|c| c.timestamp).max(),
    ) {
        (Some(first), Some(last)) => {
            let weeks = (last - first).num_days() as f64 / 7.0;
            round_to_tenth(commits.len() as f64 / weeks.max(1.0))
        }
        _ => 0.0,
    };

    ContributionSummary {
        total_commits: commits.len(),
        total_insertions,
        total_deletions,
        net_lines: total_insertions as i64 - total_deletions as i64,
        files_touched_count: files_touched.len(),
        directories_touched_count: directories.len(),
        files_touched: files_touched.into_iter().collect(),
        avg_commits_per_week,
        largest_single_commit: commits.iter().map(|c| c.total_changes()).max().unwrap_or(0),
    }
}

/// Files ranked by how many commits touched them, most active first.
/// Files with equal counts keep the order in which they were first seen.
pub fn hot_files(commits: &[Commit], top_n: usize) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for file in commits.iter().flat_map(|c| &c.files) {
        let count = counts.entry(file.as_str()).or_insert(0);
        if *count == 0 {
            order.push(file.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|file| (file.to_string(), counts[file]))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);
    ranked
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
