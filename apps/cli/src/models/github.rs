use serde::{Deserialize, Serialize};

/// A GitHub issue as returned by the REST API, trimmed to what the payload carries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueRecord {
    pub id: u64,
    pub number: u64,
    pub title: String,
    pub state: String,
    pub user: Option<String>,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
    pub comments: u64,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub is_pr: bool,
    pub body: String,
}

/// A GitHub pull request. Only `user`, `merged`, `additions` and `deletions`
/// feed the PR aggregation; the rest is passed through to the payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PullRequestRecord {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub user: Option<String>,
    pub created_at: Option<String>,
    pub closed_at: Option<String>,
    pub merged: bool,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub labels: Vec<String>,
    pub assignees: Vec<String>,
    pub comments_count: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssuesAndPrs {
    pub issues: Vec<IssueRecord>,
    pub prs: Vec<PullRequestRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pr_record_defaults_missing_fields() {
        let pr: PullRequestRecord =
            serde_json::from_value(json!({"user": "ada", "additions": 600})).unwrap();
        assert_eq!(pr.user.as_deref(), Some("ada"));
        assert_eq!(pr.additions, 600);
        assert!(!pr.merged);
        assert_eq!(pr.deletions, 0);
    }
}
