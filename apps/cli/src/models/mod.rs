pub mod commit;
pub mod github;

pub use commit::Commit;
pub use github::{IssueRecord, IssuesAndPrs, PullRequestRecord};
