//! Ticket detection and title resolution.

pub mod extract;
pub mod state_machine;
pub mod template;

pub use extract::TicketReference;
pub use state_machine::{decide, Decision, RejectReason, ResolveState, TicketSource};

use crate::context::PullRequestContext;
use crate::diagnostics::Diagnostics;
use crate::github::{GitHubError, PullRequestMutator};
use crate::inputs::ResolverConfig;

/// Comment posted when the title was rewritten from the branch name.
pub const BRANCH_COMMENT: &str = "No ticket reference was found in the pull request title, so \
the title was updated with the ticket found in the branch name. Set the `quiet` input to \
disable this comment.";

/// Comment posted when the title was rewritten from the description.
pub const BODY_COMMENT: &str = "No ticket reference was found in the pull request title, so \
the title was updated with the ticket found in the pull request description. Set the `quiet` \
input to disable this comment.";

/// Terminal value of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Title already carried a valid reference.
    Approved,
    /// Author is on the exempt list; nothing enforced.
    Exempted,
    /// Title was rewritten from a reference found elsewhere.
    TitleUpdated(TicketSource),
    /// No usable reference; the run failed.
    Rejected,
}

pub struct TicketResolver {
    config: ResolverConfig,
}

impl TicketResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }

    /// Produce exactly one outcome for the pull request, requesting a title
    /// update and a notification comment when a reference was found outside
    /// the title. Transport failures are not handled here; they abort the
    /// run through the caller.
    pub async fn resolve(
        &self,
        ctx: &PullRequestContext,
        mutator: &dyn PullRequestMutator,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Outcome, GitHubError> {
        diagnostics.debug("title", &ctx.title);
        diagnostics.debug("branch", &ctx.branch);
        diagnostics.debug("sender", ctx.sender());

        match decide(ctx, &self.config) {
            Decision::Approve => Ok(Outcome::Approved),

            Decision::Exempt => {
                diagnostics.debug("exempt", ctx.sender());
                Ok(Outcome::Exempted)
            }

            Decision::Update { source, new_title } => {
                diagnostics.debug("new title", &new_title);
                mutator.update_title(ctx.number, &new_title).await?;

                if !self.config.quiet {
                    let comment = match source {
                        TicketSource::Branch => BRANCH_COMMENT,
                        TicketSource::Body => BODY_COMMENT,
                    };
                    mutator.post_comment(ctx.number, comment).await?;
                }

                Ok(Outcome::TitleUpdated(source))
            }

            Decision::Reject(reason) => {
                diagnostics.fail(reason.message());
                Ok(Outcome::Rejected)
            }
        }
    }
}
