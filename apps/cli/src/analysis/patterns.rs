//! Pattern detection — finds bursts of related commits that suggest a larger effort.
//!
//! A pattern is a commit window with at least three members, more than one
//! affected file and a recognizable theme. Patterns are ranked by complexity.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::analysis::complexity::complexity_score;
use crate::analysis::theme::extract_theme;
use crate::analysis::windowing::CommitWindows;
use crate::models::Commit;

/// Windows smaller than this are never promoted to patterns.
const MIN_PATTERN_COMMITS: usize = 3;

#[derive(Debug, Clone, Serialize)]
pub struct CommitPattern {
    pub theme: String,
    pub commits: Vec<Commit>,
    pub files_affected: BTreeSet<String>,
    pub time_span: (DateTime<Utc>, DateTime<Utc>),
    pub total_changes: u64,
    pub complexity_score: u64,
}

/// Detects commit patterns and returns them sorted by complexity, highest first.
/// Equal scores keep chronological order.
pub fn detect_commit_patterns(commits: &[Commit]) -> Vec<CommitPattern> {
    let windows = CommitWindows::new(commits);
    let mut patterns: Vec<CommitPattern> = windows
        .iter()
        .filter(|window| window.len() >= MIN_PATTERN_COMMITS)
        .filter_map(build_pattern)
        .collect();

    patterns.sort_by(|a, b| b.complexity_score.cmp(&a.complexity_score));
    patterns
}

fn build_pattern(window: &[&Commit]) -> Option<CommitPattern> {
    let files_affected: BTreeSet<String> = window
        .iter()
        .flat_map(|c| c.files.iter().cloned())
        .collect();
    if files_affected.len() <= 1 {
        return None;
    }

    let subjects: Vec<&str> = window.iter().map(|c| c.subject()).collect();
    let theme = extract_theme(&subjects)?;

    let start = window.iter().map(|c| c.timestamp).min()?;
    let end = window.iter().map(|c| c.timestamp).max()?;
    let total_changes = window.iter().map(|c| c.total_changes()).sum();
    let complexity_score = complexity_score(window, &files_affected);

    Some(CommitPattern {
        theme,
        commits: window.iter().map(|c| (*c).clone()).collect(),
        files_affected,
        time_span: (start, end),
        total_changes,
        complexity_score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::commit::fixtures::commit;

    #[test]
    fn test_detects_themed_multi_file_window() {
        let commits = vec![
            commit("a", 0, "optimize cache layer", &["src/cache.rs"], 100),
            commit("b", 1, "optimize cache again", &["src/cache.rs", "src/db.rs"], 100),
            commit("c", 2, "unrelated fix", &["docs/notes.md"], 50),
        ];
        let patterns = detect_commit_patterns(&commits);
        assert_eq!(patterns.len(), 1);
        let p = &patterns[0];
        assert_eq!(p.theme, "Optimize");
        assert_eq!(p.commits.len(), 3);
        assert_eq!(p.files_affected.len(), 3);
        assert_eq!(p.total_changes, 250);
        // 30 + 2 dirs * 5 + 2
        assert_eq!(p.complexity_score, 42);
        assert_eq!(p.time_span.0, commits[0].timestamp);
        assert_eq!(p.time_span.1, commits[2].timestamp);
    }

    #[test]
    fn test_single_file_window_never_becomes_a_pattern() {
        let commits: Vec<_> = (0..6)
            .map(|i| commit(&format!("c{i}"), 0, "tune parser speed", &["src/parser.rs"], 500))
            .collect();
        assert!(detect_commit_patterns(&commits).is_empty());
    }

    #[test]
    fn test_two_commit_window_is_not_promoted() {
        let commits = vec![
            commit("a", 0, "migrate schema", &["a.sql"], 10),
            commit("b", 1, "migrate schema", &["b.sql"], 10),
        ];
        assert!(detect_commit_patterns(&commits).is_empty());
    }

    #[test]
    fn test_window_without_theme_is_dropped() {
        let commits = vec![
            commit("a", 0, "alpha", &["a.rs"], 10),
            commit("b", 1, "bravo", &["b.rs"], 10),
            commit("c", 2, "charlie", &["c.rs"], 10),
        ];
        assert!(detect_commit_patterns(&commits).is_empty());
    }

    #[test]
    fn test_patterns_sorted_by_complexity_descending() {
        let mut commits = vec![
            commit("a", 0, "docs update", &["a.md"], 0),
            commit("b", 1, "docs update", &["b.md"], 0),
            commit("c", 2, "docs update", &["c.md"], 0),
        ];
        commits.extend([
            commit("d", 30, "ingest pipeline", &["src/x/a.rs"], 900),
            commit("e", 31, "ingest pipeline", &["src/y/b.rs"], 900),
            commit("f", 32, "ingest pipeline", &["src/z/c.rs"], 900),
            commit("g", 33, "ingest pipeline", &["src/z/d.rs"], 900),
        ]);
        let patterns = detect_commit_patterns(&commits);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].theme, "Ingest");
        assert_eq!(patterns[1].theme, "Docs");
        assert!(patterns[0].complexity_score > patterns[1].complexity_score);
    }

    #[test]
    fn test_no_commits_no_patterns() {
        assert!(detect_commit_patterns(&[]).is_empty());
    }
}
