use std::collections::HashSet;

use crate::models::commit::parent_dir;
use crate::models::Commit;

const COMMIT_WEIGHT: u64 = 10;
const DIRECTORY_WEIGHT: u64 = 5;
const LINES_PER_POINT: u64 = 100;

/// Complexity of a group of commits:
/// `10 * commits + 5 * distinct parent directories + total_changes / 100`.
pub fn complexity_score<'f, I>(commits: &[&Commit], files: I) -> u64
where
    I: IntoIterator<Item = &'f String>,
{
    let total_changes: u64 = commits.iter().map(|c| c.total_changes()).sum();
    score_parts(commits.len(), files, total_changes)
}

fn score_parts<'f, I>(commit_count: usize, files: I, total_changes: u64) -> u64
where
    I: IntoIterator<Item = &'f String>,
{
    let directories: HashSet<&str> = files.into_iter().map(|f| parent_dir(f)).collect();
    COMMIT_WEIGHT * commit_count as u64
        + DIRECTORY_WEIGHT * directories.len() as u64
        + total_changes / LINES_PER_POINT
}
