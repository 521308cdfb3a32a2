// pr-ticket-check - ticket reference enforcement for pull requests
// This exposes the core components for testing and integration

pub mod context;
pub mod diagnostics;
pub mod github;
pub mod inputs;
pub mod resolver;
pub mod telemetry;

// Re-export key types for easy access
pub use context::{AuthorKind, ContextError, PullRequestContext};
pub use diagnostics::{Diagnostics, WorkflowCommands};
pub use github::{GitHubClient, GitHubError, PullRequestMutator};
pub use inputs::{ActionInputs, ConfigError, ResolverConfig};
pub use resolver::{Outcome, TicketResolver, TicketSource};
pub use telemetry::{generate_run_id, init_telemetry};
