use std::collections::BTreeMap;

use crate::models::Commit;

/// Commits on a file after which ownership is treated as complete.
const FULL_OWNERSHIP_COMMITS: f64 = 10.0;

/// Ownership above this fraction is considered significant downstream.
pub const SIGNIFICANT_OWNERSHIP: f64 = 0.3;

/// Estimates ownership per file as `min(1.0, commits_touching_file / 10)`.
///
/// Only the contributor's own commits are counted; there is no comparison
/// against other authors.
pub fn estimate_ownership(commits: &[Commit]) -> BTreeMap<String, f64> {
    let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
    for commit in commits {
        for file in &commit.files {
            *counts.entry(file.as_str()).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(file, count)| {
            (
                file.to_string(),
                (count as f64 / FULL_OWNERSHIP_COMMITS).min(1.0),
            )
        })
        .collect()
}

/// Keeps only the entries strictly above [`SIGNIFICANT_OWNERSHIP`].
pub fn significant_ownership(ownership: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
    ownership
        .iter()
        .filter(|(_, &fraction)| fraction > SIGNIFICANT_OWNERSHIP)
        .map(|(file, &fraction)| (file.clone(), fraction))
        .collect()
}
