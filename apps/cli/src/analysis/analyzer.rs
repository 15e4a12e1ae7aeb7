//! Signal Analyzer — runs the collaborators, then every analysis pass, and
//! compiles the result into a [`SignalPayload`].
//!
//! Flow: git history → code scan → GitHub → contribution filter/summary →
//!       patterns, impact, ownership, PRs → compile.
//!
//! `gather` does the I/O; `analyze` is pure over what was gathered.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::info;

use crate::analysis::compiler::{compile_signals, PayloadMetadata, SignalInputs, SignalPayload};
use crate::analysis::impact::detect_impact_signals;
use crate::analysis::ownership::estimate_ownership;
use crate::analysis::patterns::detect_commit_patterns;
use crate::analysis::pr_analysis::analyze_pr_patterns;
use crate::analysis::summary::{contributions_by_user, hot_files, summarize_contributions};
use crate::config::Config;
use crate::models::{Commit, IssuesAndPrs};
use crate::sources::code_scan::{detect_components, language_breakdown, walk_code};
use crate::sources::git::{github_owner_repo, load_git_history, HistoryFilter};
use crate::sources::github::load_issues_prs;
use crate::sources::SourceError;

const TOTAL_STEPS: usize = 6;

/// Everything read from the outside world before analysis starts.
#[derive(Debug, Clone, Default)]
pub struct RawSignals {
    pub commits: Vec<Commit>,
    pub files: Vec<String>,
    pub issues_prs: IssuesAndPrs,
}

pub struct SignalAnalyzer<'c> {
    config: &'c Config,
}

impl<'c> SignalAnalyzer<'c> {
    pub fn new(config: &'c Config) -> Self {
        Self { config }
    }

    /// Gathers raw inputs and analyzes them in one go.
    pub async fn run(&self, repo_path: &Path) -> Result<SignalPayload, SourceError> {
        let raw = self.gather(repo_path).await?;
        Ok(self.analyze(raw, &repo_path.display().to_string(), Utc::now()))
    }

    /// Reads git history, walks the tree and fetches GitHub records. Git and
    /// the walk run on the blocking pool.
    pub async fn gather(&self, repo_path: &Path) -> Result<RawSignals, SourceError> {
        let filter = HistoryFilter::from(&self.config.git);
        let path: PathBuf = repo_path.to_path_buf();

        step(1, "Loading git history");
        let commits = {
            let path = path.clone();
            tokio::task::spawn_blocking(move || load_git_history(&path, &filter)).await??
        };
        info!("  → {} commits in history", commits.len());

        step(2, "Scanning code structure");
        let files = {
            let path = path.clone();
            let extensions = self.config.analysis.languages_of_interest.clone();
            let max_files = self.config.analysis.max_files;
            tokio::task::spawn_blocking(move || walk_code(&path, &extensions, max_files)).await?
        };
        info!("  → {} files scanned", files.len());

        step(3, "Fetching GitHub issues and pull requests");
        let (owner, repo) = self.github_coordinates(&path);
        let issues_prs =
            load_issues_prs(self.config.env.github_token.as_deref(), &owner, &repo).await;
        info!(
            "  → {} issues, {} pull requests",
            issues_prs.issues.len(),
            issues_prs.prs.len()
        );

        Ok(RawSignals {
            commits,
            files,
            issues_prs,
        })
    }

    /// Derives every signal from `raw` and compiles the payload.
    pub fn analyze(&self, raw: RawSignals, repo_path: &str, now: DateTime<Utc>) -> SignalPayload {
        let you = &self.config.you;

        step(4, "Filtering contributions");
        let (mut yours, others) = contributions_by_user(raw.commits, &you.aliases, &you.emails);
        yours.sort_by_key(|c| c.timestamp);
        let summary = summarize_contributions(&yours);
        let top_files = hot_files(&yours, self.config.analysis.hot_file_top_n);
        info!("  → {} commits attributed, {} by others", yours.len(), others.len());

        step(5, "Detecting patterns and impact signals");
        let patterns = detect_commit_patterns(&yours);
        let impact_signals = detect_impact_signals(&yours);
        let ownership = estimate_ownership(&yours);
        let pr_analysis = analyze_pr_patterns(&raw.issues_prs.prs, &you.aliases);
        info!(
            "  → {} patterns, {} impact signals, {} files owned",
            patterns.len(),
            impact_signals.len(),
            ownership.len()
        );

        step(6, "Compiling signal payload");
        compile_signals(
            SignalInputs {
                commits: &yours,
                summary,
                top_files,
                languages: language_breakdown(&raw.files),
                components: detect_components(&raw.files),
                patterns: &patterns,
                impact_signals: &impact_signals,
                ownership: &ownership,
                pr_analysis,
                issues_prs: &raw.issues_prs,
            },
            PayloadMetadata {
                person_name: you.full_name.clone(),
                analysis_date: now.to_rfc3339(),
                repo_path: repo_path.to_string(),
            },
        )
    }

    /// Owner/repo from the environment, falling back to the `origin` remote.
    fn github_coordinates(&self, repo_path: &Path) -> (String, String) {
        let env = &self.config.env;
        match (&env.github_owner, &env.github_repo) {
            (Some(owner), Some(repo)) => (owner.clone(), repo.clone()),
            _ => {
                let remote = github_owner_repo(repo_path).unwrap_or_default();
                (
                    env.github_owner.clone().unwrap_or(remote.0),
                    env.github_repo.clone().unwrap_or(remote.1),
                )
            }
        }
    }
}

fn step(n: usize, message: &str) {
    info!("[{n}/{TOTAL_STEPS}] {message}...");
}
