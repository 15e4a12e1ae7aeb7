//! Git history extraction over libgit2.

use std::path::Path;

use chrono::{DateTime, TimeZone, Utc};
use git2::{DiffOptions, ErrorCode, Repository, Sort};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::GitConfig;
use crate::models::Commit;
use crate::sources::SourceError;

static GITHUB_REMOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"github\.com[:/]([^/]+)/([^/]+?)(?:\.git)?/?$").unwrap());

/// Which commits of the history to keep.
#[derive(Debug, Clone, Default)]
pub struct HistoryFilter {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
    pub include_merges: bool,
}

impl From<&GitConfig> for HistoryFilter {
    fn from(git: &GitConfig) -> Self {
        Self {
            since: git.since,
            until: git.until,
            include_merges: git.include_merge_commits,
        }
    }
}

impl HistoryFilter {
    fn admits(&self, authored: DateTime<Utc>, parent_count: usize) -> bool {
        if !self.include_merges && parent_count > 1 {
            return false;
        }
        self.since.map_or(true, |since| authored >= since)
            && self.until.map_or(true, |until| authored <= until)
    }
}

/// Loads every commit reachable from HEAD, newest first, with per-commit
/// file lists and line stats taken from the diff against the first parent.
/// A repository without commits yields an empty history.
pub fn load_git_history(repo_path: &Path, filter: &HistoryFilter) -> Result<Vec<Commit>, SourceError> {
    let repo = Repository::open(repo_path)?;
    if repo.is_bare() {
        return Err(SourceError::BareRepository(repo_path.display().to_string()));
    }

    match repo.head() {
        Ok(_) => {}
        Err(e) if matches!(e.code(), ErrorCode::UnbornBranch | ErrorCode::NotFound) => {
            debug!("Repository at {} has no commits yet", repo_path.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    }

    let mut walk = repo.revwalk()?;
    walk.push_head()?;
    walk.set_sorting(Sort::TIME)?;

    let mut commits = Vec::new();
    for oid in walk {
        let commit = repo.find_commit(oid?)?;
        let author = commit.author();
        let timestamp = Utc
            .timestamp_opt(author.when().seconds(), 0)
            .single()
            .unwrap_or_default();

        if !filter.admits(timestamp, commit.parent_count()) {
            continue;
        }

        let tree = commit.tree()?;
        let parent_tree = if commit.parent_count() > 0 {
            Some(commit.parent(0)?.tree()?)
        } else {
            None
        };
        let diff = repo.diff_tree_to_tree(
            parent_tree.as_ref(),
            Some(&tree),
            Some(&mut DiffOptions::new()),
        )?;
        let stats = diff.stats()?;
        let files = diff
            .deltas()
            .filter_map(|delta| delta.new_file().path().or_else(|| delta.old_file().path()))
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .collect();

        commits.push(Commit {
            id: commit.id().to_string(),
            author_name: author.name().unwrap_or_default().to_string(),
            author_email: author.email().unwrap_or_default().to_string(),
            timestamp,
            message: commit.message().unwrap_or_default().trim().to_string(),
            files,
            insertions: stats.insertions() as u64,
            deletions: stats.deletions() as u64,
        });
    }

    debug!("Loaded {} commits from {}", commits.len(), repo_path.display());
    Ok(commits)
}

/// Owner and repository name parsed from the `origin` remote, if it points at GitHub.
pub fn github_owner_repo(repo_path: &Path) -> Option<(String, String)> {
    let repo = Repository::open(repo_path).ok()?;
    let remote = repo.find_remote("origin").ok()?;
    parse_github_remote(remote.url()?)
}

fn parse_github_remote(url: &str) -> Option<(String, String)> {
    let caps = GITHUB_REMOTE.captures(url.trim())?;
    Some((caps[1].to_string(), caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use git2::{Signature, Time};
    use std::fs;
    use tempfile::TempDir;

    const DAY: i64 = 86_400;
    const BASE: i64 = 1_709_251_200; // 2024-03-01T00:00:00Z

    fn commit_file(repo: &Repository, name: &str, contents: &str, message: &str, day: i64) {
        let workdir = repo.workdir().unwrap().to_path_buf();
        fs::write(workdir.join(name), contents).unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new(name)).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = Signature::new("Ada Lovelace", "ada@example.com", &Time::new(BASE + day * DAY, 0))
            .unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .unwrap();
    }

    fn fixture_repo() -> (TempDir, Repository) {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        commit_file(&repo, "a.txt", "one\ntwo\n", "Add a\n\nLonger body", 0);
        commit_file(&repo, "a.txt", "one\nthree\n", "Change a", 3);
        commit_file(&repo, "b.txt", "x\n", "Add b", 10);
        (dir, repo)
    }

    #[test]
    fn test_history_has_files_and_stats() {
        let (dir, _repo) = fixture_repo();
        let commits = load_git_history(dir.path(), &HistoryFilter::default()).unwrap();
        assert_eq!(commits.len(), 3);

        let newest = &commits[0];
        assert_eq!(newest.message, "Add b");
        assert_eq!(newest.files, vec!["b.txt"]);
        assert_eq!(newest.insertions, 1);

        let change = &commits[1];
        assert_eq!(change.files, vec!["a.txt"]);
        assert_eq!(change.insertions, 1);
        assert_eq!(change.deletions, 1);

        let first = &commits[2];
        assert_eq!(first.subject(), "Add a");
        assert_eq!(first.insertions, 2);
        assert_eq!(first.author_email, "ada@example.com");
    }

    #[test]
    fn test_history_respects_date_bounds() {
        let (dir, _repo) = fixture_repo();
        let filter = HistoryFilter {
            since: Utc.timestamp_opt(BASE + DAY, 0).single(),
            until: Utc.timestamp_opt(BASE + 5 * DAY, 0).single(),
            include_merges: false,
        };
        let commits = load_git_history(dir.path(), &filter).unwrap();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "Change a");
    }

    #[test]
    fn test_empty_repository_has_no_history() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        assert!(load_git_history(dir.path(), &HistoryFilter::default())
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(load_git_history(&missing, &HistoryFilter::default()).is_err());
    }

    #[test]
    fn test_owner_repo_from_origin_remote() {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        repo.remote("origin", "git@github.com:someowner/somerepo.git")
            .unwrap();
        assert_eq!(
            github_owner_repo(dir.path()),
            Some(("someowner".to_string(), "somerepo".to_string()))
        );
    }

    #[test]
    fn test_parse_github_remote_forms() {
        assert_eq!(
            parse_github_remote("https://github.com/rust-lang/rust.git"),
            Some(("rust-lang".to_string(), "rust".to_string()))
        );
        assert_eq!(
            parse_github_remote("https://github.com/rust-lang/cargo/"),
            Some(("rust-lang".to_string(), "cargo".to_string()))
        );
        assert_eq!(parse_github_remote("https://gitlab.com/a/b.git"), None);
    }

    #[test]
    fn test_no_origin_remote() {
        let dir = TempDir::new().unwrap();
        Repository::init(dir.path()).unwrap();
        assert_eq!(github_owner_repo(dir.path()), None);
    }
}
