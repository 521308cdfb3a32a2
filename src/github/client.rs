//! GitHub mutation client.
//!
//! The resolver only ever asks for two things: rewrite the pull request
//! title and post an explanatory comment. Both go through a trait so the
//! decision logic is testable without the network.

use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::{debug, info};

use super::errors::GitHubError;

/// Mutations the resolver may request against the pull request. Results
/// are not inspected beyond success.
#[async_trait]
pub trait PullRequestMutator: Send + Sync {
    /// Replace the pull request title.
    async fn update_title(&self, number: u64, title: &str) -> Result<(), GitHubError>;

    /// Post a plain comment on the pull request.
    async fn post_comment(&self, number: u64, body: &str) -> Result<(), GitHubError>;
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    octocrab: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubClient {
    pub fn new(token: String, owner: String, repo: String) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder().personal_token(token).build()?;

        Ok(Self {
            octocrab,
            owner,
            repo,
        })
    }

    /// Client pointed at an alternate API endpoint. Integration tests use
    /// this to talk to a local mock server.
    pub fn with_base_uri(
        base_uri: &str,
        token: String,
        owner: String,
        repo: String,
    ) -> Result<Self, GitHubError> {
        let octocrab = Octocrab::builder()
            .base_uri(base_uri)?
            .personal_token(token)
            .build()?;

        Ok(Self {
            octocrab,
            owner,
            repo,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }
}

#[async_trait]
impl PullRequestMutator for GitHubClient {
    async fn update_title(&self, number: u64, title: &str) -> Result<(), GitHubError> {
        debug!(
            owner = %self.owner,
            repo = %self.repo,
            number,
            "updating pull request title"
        );

        self.octocrab
            .pulls(&self.owner, &self.repo)
            .update(number)
            .title(title)
            .send()
            .await?;

        info!(number, title, "pull request title updated");
        Ok(())
    }

    async fn post_comment(&self, number: u64, body: &str) -> Result<(), GitHubError> {
        self.octocrab
            .issues(&self.owner, &self.repo)
            .create_comment(number, body)
            .await?;

        info!(number, "notification comment posted");
        Ok(())
    }
}
