//! GitHub issue and pull request retrieval over the REST API.
//!
//! Retrieval is best effort: a missing token, placeholder repository
//! coordinates or any API failure yields empty lists and a warning.

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{IssueRecord, IssuesAndPrs, PullRequestRecord};
use crate::sources::SourceError;

const GITHUB_API_URL: &str = "https://api.github.com";
const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 20;
const MAX_BODY_CHARS: usize = 4000;

const PLACEHOLDER_OWNER: &str = "your-org-or-username";
const PLACEHOLDER_REPO: &str = "your-repo-name";

#[derive(Debug, Deserialize)]
struct ApiUser {
    login: String,
}

#[derive(Debug, Deserialize)]
struct ApiLabel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiIssue {
    id: u64,
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    state: String,
    user: Option<ApiUser>,
    created_at: Option<String>,
    closed_at: Option<String>,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    assignees: Vec<ApiUser>,
    pull_request: Option<serde_json::Value>,
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPullSummary {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct ApiPull {
    number: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    state: String,
    user: Option<ApiUser>,
    created_at: Option<String>,
    closed_at: Option<String>,
    #[serde(default)]
    merged: bool,
    #[serde(default)]
    additions: u64,
    #[serde(default)]
    deletions: u64,
    #[serde(default)]
    changed_files: u64,
    #[serde(default)]
    labels: Vec<ApiLabel>,
    #[serde(default)]
    assignees: Vec<ApiUser>,
    #[serde(default)]
    comments: u64,
    #[serde(default)]
    review_comments: u64,
}

impl From<ApiIssue> for IssueRecord {
    fn from(issue: ApiIssue) -> Self {
        Self {
            id: issue.id,
            number: issue.number,
            title: issue.title,
            state: issue.state,
            user: issue.user.map(|u| u.login),
            created_at: issue.created_at,
            closed_at: issue.closed_at,
            comments: issue.comments,
            labels: issue.labels.into_iter().map(|l| l.name).collect(),
            assignees: issue.assignees.into_iter().map(|a| a.login).collect(),
            is_pr: issue.pull_request.is_some(),
            body: issue
                .body
                .unwrap_or_default()
                .chars()
                .take(MAX_BODY_CHARS)
                .collect(),
        }
    }
}

impl From<ApiPull> for PullRequestRecord {
    fn from(pr: ApiPull) -> Self {
        Self {
            number: pr.number,
            title: pr.title,
            state: pr.state,
            user: pr.user.map(|u| u.login),
            created_at: pr.created_at,
            closed_at: pr.closed_at,
            merged: pr.merged,
            additions: pr.additions,
            deletions: pr.deletions,
            changed_files: pr.changed_files,
            labels: pr.labels.into_iter().map(|l| l.name).collect(),
            assignees: pr.assignees.into_iter().map(|a| a.login).collect(),
            comments_count: pr.comments + pr.review_comments,
        }
    }
}

/// Why retrieval is skipped without touching the network, if it is.
fn skip_reason(token: Option<&str>, owner: &str, repo: &str) -> Option<&'static str> {
    if token.map_or(true, |t| t.trim().is_empty()) {
        Some("GITHUB_TOKEN is not set")
    } else if owner.is_empty() || repo.is_empty() {
        Some("repository owner/name unknown")
    } else if owner == PLACEHOLDER_OWNER || repo == PLACEHOLDER_REPO {
        Some("repository owner/name are placeholders")
    } else {
        None
    }
}

/// Thin REST client over the handful of endpoints the analysis needs.
#[derive(Clone)]
pub struct GitHubClient {
    client: Client,
    token: String,
    base_url: String,
}

impl GitHubClient {
    pub fn new(token: String) -> Result<Self, SourceError> {
        Ok(Self {
            client: Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .timeout(std::time::Duration::from_secs(30))
                .build()?,
            token,
            base_url: GITHUB_API_URL.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, page: Option<usize>) -> Result<T, SourceError> {
        let mut request = self
            .client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json");
        if let Some(page) = page {
            request = request.query(&[
                ("state", "all".to_string()),
                ("per_page", PER_PAGE.to_string()),
                ("page", page.to_string()),
            ]);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            return Err(SourceError::GitHub {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    async fn paginate<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, SourceError> {
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let batch: Vec<T> = self.get(path, Some(page)).await?;
            let done = batch.len() < PER_PAGE;
            items.extend(batch);
            if done {
                break;
            }
        }
        Ok(items)
    }

    pub async fn issues_and_prs(&self, owner: &str, repo: &str) -> Result<IssuesAndPrs, SourceError> {
        let issues: Vec<ApiIssue> = self.paginate(&format!("/repos/{owner}/{repo}/issues")).await?;
        debug!("Fetched {} issues for {owner}/{repo}", issues.len());

        // The list endpoint omits merge state and line stats.
        let summaries: Vec<ApiPullSummary> =
            self.paginate(&format!("/repos/{owner}/{repo}/pulls")).await?;
        let mut prs = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let pull: ApiPull = self
                .get(&format!("/repos/{owner}/{repo}/pulls/{}", summary.number), None)
                .await?;
            prs.push(PullRequestRecord::from(pull));
        }
        debug!("Fetched {} pull requests for {owner}/{repo}", prs.len());

        Ok(IssuesAndPrs {
            issues: issues.into_iter().map(IssueRecord::from).collect(),
            prs,
        })
    }
}

/// Loads issues and PRs, degrading to empty lists on any failure.
pub async fn load_issues_prs(token: Option<&str>, owner: &str, repo: &str) -> IssuesAndPrs {
    if let Some(reason) = skip_reason(token, owner, repo) {
        warn!("Skipping GitHub retrieval: {reason}");
        return IssuesAndPrs::default();
    }

    let result = match GitHubClient::new(token.unwrap_or_default().to_string()) {
        Ok(client) => client.issues_and_prs(owner, repo).await,
        Err(e) => Err(e),
    };
    result.unwrap_or_else(|e| {
        warn!("GitHub retrieval failed, continuing without issues/PRs: {e}");
        IssuesAndPrs::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skip_reasons() {
        assert!(skip_reason(None, "o", "r").is_some());
        assert!(skip_reason(Some(" "), "o", "r").is_some());
        assert!(skip_reason(Some("t"), "", "r").is_some());
        assert!(skip_reason(Some("t"), PLACEHOLDER_OWNER, "r").is_some());
        assert!(skip_reason(Some("t"), "o", PLACEHOLDER_REPO).is_some());
        assert!(skip_reason(Some("t"), "o", "r").is_none());
    }

    #[tokio::test]
    async fn test_missing_token_degrades_to_empty() {
        let loaded = load_issues_prs(None, "rust-lang", "rust").await;
        assert!(loaded.issues.is_empty());
        assert!(loaded.prs.is_empty());
    }

    #[test]
    fn test_issue_conversion() {
        let raw: ApiIssue = serde_json::from_value(json!({
            "id": 7,
            "number": 3,
            "title": "Crash on start",
            "state": "closed",
            "user": {"login": "ada"},
            "created_at": "2024-03-01T00:00:00Z",
            "closed_at": null,
            "comments": 2,
            "labels": [{"name": "bug"}],
            "assignees": [{"login": "grace"}],
            "pull_request": {"url": "https://api.github.com/x"},
            "body": "b".repeat(5000)
        }))
        .unwrap();
        let issue = IssueRecord::from(raw);
        assert_eq!(issue.user.as_deref(), Some("ada"));
        assert_eq!(issue.labels, vec!["bug"]);
        assert_eq!(issue.assignees, vec!["grace"]);
        assert!(issue.is_pr);
        assert_eq!(issue.body.len(), 4000);
    }

    #[test]
    fn test_pull_conversion_sums_comments() {
        let raw: ApiPull = serde_json::from_value(json!({
            "number": 12,
            "title": "Add cache",
            "state": "closed",
            "user": null,
            "merged": true,
            "additions": 640,
            "deletions": 12,
            "changed_files": 4,
            "comments": 3,
            "review_comments": 5
        }))
        .unwrap();
        let pr = PullRequestRecord::from(raw);
        assert_eq!(pr.user, None);
        assert!(pr.merged);
        assert_eq!(pr.additions, 640);
        assert_eq!(pr.comments_count, 8);
    }
}
