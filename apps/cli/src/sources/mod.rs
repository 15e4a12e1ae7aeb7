//! Collaborators that feed the analysis: local git history, the GitHub REST
//! API and a walk over the working tree.

pub mod code_scan;
pub mod git;
pub mod github;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Repository at {0} is bare")]
    BareRepository(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GitHub API error (status {status}): {message}")]
    GitHub { status: u16, message: String },

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
