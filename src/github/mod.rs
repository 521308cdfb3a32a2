pub mod client;
pub mod errors;

pub use client::{GitHubClient, PullRequestMutator};
pub use errors::GitHubError;
