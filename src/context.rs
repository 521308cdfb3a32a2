//! Pull request snapshot built from the workflow event payload.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("GITHUB_EVENT_PATH is not set; this binary expects to run inside a workflow")]
    MissingEventPath,
    #[error("could not read event payload at {path}: {source}")]
    UnreadablePayload {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse event payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),
    #[error("event payload does not describe a pull request")]
    NotAPullRequest,
}

/// Account kind reported for the pull request author.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorKind {
    User,
    Bot,
    Other,
}

impl From<&str> for AuthorKind {
    fn from(kind: &str) -> Self {
        match kind {
            "User" => AuthorKind::User,
            "Bot" => AuthorKind::Bot,
            _ => AuthorKind::Other,
        }
    }
}

/// Immutable snapshot of the pull request under check. Supplied once per
/// invocation; never mutated.
#[derive(Debug, Clone)]
pub struct PullRequestContext {
    pub owner: String,
    pub repo: String,
    pub number: u64,
    pub title: String,
    pub branch: String,
    pub body: Option<String>,
    pub author_login: String,
    pub author_kind: AuthorKind,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<EventPullRequest>,
    repository: EventRepository,
}

#[derive(Debug, Deserialize)]
struct EventPullRequest {
    number: u64,
    title: String,
    body: Option<String>,
    head: EventRef,
    user: EventAccount,
}

#[derive(Debug, Deserialize)]
struct EventRef {
    #[serde(rename = "ref")]
    ref_field: String,
}

#[derive(Debug, Deserialize)]
struct EventAccount {
    login: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct EventRepository {
    name: String,
    owner: EventAccount,
}

impl PullRequestContext {
    /// Build the context from the event payload named by GITHUB_EVENT_PATH.
    pub fn from_env() -> Result<Self, ContextError> {
        let path =
            std::env::var("GITHUB_EVENT_PATH").map_err(|_| ContextError::MissingEventPath)?;
        Self::from_event_path(Path::new(&path))
    }

    pub fn from_event_path(path: &Path) -> Result<Self, ContextError> {
        let raw = std::fs::read_to_string(path).map_err(|source| {
            ContextError::UnreadablePayload {
                path: path.display().to_string(),
                source,
            }
        })?;
        Self::from_event_json(&raw)
    }

    pub fn from_event_json(raw: &str) -> Result<Self, ContextError> {
        let payload: EventPayload = serde_json::from_str(raw)?;
        let pr = payload.pull_request.ok_or(ContextError::NotAPullRequest)?;

        Ok(Self {
            owner: payload.repository.owner.login,
            repo: payload.repository.name,
            number: pr.number,
            title: pr.title,
            branch: pr.head.ref_field,
            body: pr.body,
            author_login: pr.user.login,
            author_kind: AuthorKind::from(pr.user.kind.as_str()),
        })
    }

    /// Author identity used for exemption checks. The platform marks
    /// automation accounts with a trailing `[bot]` token on the login;
    /// that marker is stripped so exempt lists can name the app itself.
    pub fn sender(&self) -> &str {
        match self.author_kind {
            AuthorKind::Bot => self
                .author_login
                .strip_suffix("[bot]")
                .unwrap_or(&self.author_login),
            _ => &self.author_login,
        }
    }
}
