use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single commit as loaded from git history. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub author_name: String,
    pub author_email: String,
    pub timestamp: DateTime<Utc>,
    pub message: String,
    pub files: Vec<String>,
    pub insertions: u64,
    pub deletions: u64,
}

impl Commit {
    /// First line of the commit message.
    pub fn subject(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    pub fn total_changes(&self) -> u64 {
        self.insertions + self.deletions
    }
}

/// Parent directory of a repository-relative path. Top-level files map to "".
pub fn parent_dir(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}
