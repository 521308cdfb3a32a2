//! Resolution state machine.
//!
//! Detection runs through fixed stages in strict precedence order; each
//! stage either settles the run or hands off to the next. Decisions are
//! pure so precedence and short-circuiting are testable without the
//! transport.

use crate::context::PullRequestContext;
use crate::inputs::ResolverConfig;

use super::extract::{extract_id, TicketReference};
use super::template::render_title;

/// Where a rewritten title's ticket reference came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketSource {
    Branch,
    Body,
}

/// Fatal detection results, each carrying a stable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    BranchExtraction,
    MissingBody,
    BodyExtraction,
    NoReference,
}

impl RejectReason {
    pub fn message(&self) -> &'static str {
        match self {
            RejectReason::BranchExtraction => {
                "could not extract a ticket ID reference from the branch"
            }
            RejectReason::MissingBody => "could not retrieve the pull request body",
            RejectReason::BodyExtraction => {
                "could not extract a ticket shorthand reference from the body"
            }
            RejectReason::NoReference => "no ticket was referenced in this pull request",
        }
    }
}

/// Terminal result of the decision machine, before side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Exempt,
    Update {
        source: TicketSource,
        new_title: String,
    },
    Reject(RejectReason),
}

/// Detection stages in precedence order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveState {
    CheckTitle,
    CheckExemption,
    CheckBranch,
    CheckBody,
    Done(Decision),
}

impl ResolveState {
    /// Advance one stage. Transitions are deterministic and short-circuit:
    /// an earlier stage settling the run preempts everything after it.
    pub fn step(self, ctx: &PullRequestContext, config: &ResolverConfig) -> ResolveState {
        match self {
            ResolveState::CheckTitle => {
                if config.title_pattern.is_match(&ctx.title) {
                    ResolveState::Done(Decision::Approve)
                } else {
                    ResolveState::CheckExemption
                }
            }

            ResolveState::CheckExemption => {
                let sender = ctx.sender();
                if !sender.is_empty() && config.exempt_users.iter().any(|user| user == sender) {
                    ResolveState::Done(Decision::Exempt)
                } else {
                    ResolveState::CheckBranch
                }
            }

            ResolveState::CheckBranch => {
                let Some(m) = config.branch_pattern.find(&ctx.branch) else {
                    return ResolveState::CheckBody;
                };

                // the identifier comes from the whole branch name, not just
                // the matched fragment
                let reference = TicketReference {
                    matched: m.as_str().to_string(),
                    ticket_id: extract_id(&ctx.branch, &config.ticket_pattern),
                };

                match reference.ticket_id {
                    // terminal: a matched branch that yields no identifier
                    // never falls through to the body check
                    None => ResolveState::Done(Decision::Reject(RejectReason::BranchExtraction)),
                    Some(id) => ResolveState::Done(Decision::Update {
                        source: TicketSource::Branch,
                        new_title: render_title(
                            &config.title_format,
                            &config.ticket_prefix,
                            &id,
                            &ctx.title,
                        ),
                    }),
                }
            }

            ResolveState::CheckBody => {
                let Some(body) = ctx.body.as_deref() else {
                    return ResolveState::Done(Decision::Reject(RejectReason::MissingBody));
                };

                let Some(m) = config.body_pattern.find(body) else {
                    return ResolveState::Done(Decision::Reject(RejectReason::NoReference));
                };

                // the shorthand is pulled from the matched substring only
                let reference = TicketReference {
                    matched: m.as_str().to_string(),
                    ticket_id: extract_id(m.as_str(), &config.ticket_pattern),
                };

                match reference.ticket_id {
                    None => ResolveState::Done(Decision::Reject(RejectReason::BodyExtraction)),
                    Some(id) => ResolveState::Done(Decision::Update {
                        source: TicketSource::Body,
                        new_title: render_title(
                            &config.title_format,
                            &config.ticket_prefix,
                            &id,
                            &ctx.title,
                        ),
                    }),
                }
            }

            done @ ResolveState::Done(_) => done,
        }
    }
}

/// Run the machine to completion.
pub fn decide(ctx: &PullRequestContext, config: &ResolverConfig) -> Decision {
    let mut state = ResolveState::CheckTitle;
    loop {
        state = state.step(ctx, config);
        if let ResolveState::Done(decision) = state {
            return decision;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::AuthorKind;
    use crate::inputs::compile_pattern;

    fn config() -> ResolverConfig {
        ResolverConfig {
            title_pattern: compile_pattern(r"^\[?[A-Z]{2,}-\d+\]?", "").unwrap(),
            branch_pattern: compile_pattern(r"[A-Z]{2,}-\d+", "").unwrap(),
            body_pattern: compile_pattern(r"[A-Z]{2,}-\d+", "").unwrap(),
            ticket_pattern: compile_pattern(r"[A-Z]{2,}-\d+", "").unwrap(),
            title_format: "[%id%] %title%".to_string(),
            ticket_prefix: String::new(),
            exempt_users: Vec::new(),
            quiet: false,
        }
    }

    fn context() -> PullRequestContext {
        PullRequestContext {
            owner: "test-owner".to_string(),
            repo: "test-repo".to_string(),
            number: 1,
            title: "Add login flow".to_string(),
            branch: "feature/login".to_string(),
            body: None,
            author_login: "octocat".to_string(),
            author_kind: AuthorKind::User,
        }
    }

    #[test]
    fn matching_title_approves_regardless_of_everything_else() {
        let mut config = config();
        config.exempt_users = vec!["octocat".to_string()];

        let mut ctx = context();
        ctx.title = "TICK-1 Add login flow".to_string();
        ctx.branch = "feature/TICK-99-login".to_string();
        ctx.body = Some("TICK-100".to_string());

        assert_eq!(decide(&ctx, &config), Decision::Approve);
    }

    #[test]
    fn exemption_is_only_reached_after_the_title_fails() {
        let mut config = config();
        config.exempt_users = vec!["octocat".to_string()];

        let mut ctx = context();
        ctx.branch = "feature/TICK-42-login".to_string();
        ctx.body = Some("TICK-7".to_string());

        assert_eq!(decide(&ctx, &config), Decision::Exempt);
    }

    #[test]
    fn bot_sender_is_matched_without_the_suffix() {
        let mut config = config();
        config.exempt_users = vec!["release-bot".to_string()];

        let mut ctx = context();
        ctx.author_login = "release-bot[bot]".to_string();
        ctx.author_kind = AuthorKind::Bot;

        assert_eq!(decide(&ctx, &config), Decision::Exempt);
    }

    #[test]
    fn empty_sender_is_never_exempt() {
        let mut config = config();
        config.exempt_users = vec![String::new()];

        let mut ctx = context();
        ctx.author_login = "[bot]".to_string();
        ctx.author_kind = AuthorKind::Bot;
        ctx.body = Some("TICK-7".to_string());

        assert_eq!(
            decide(&ctx, &config),
            Decision::Update {
                source: TicketSource::Body,
                new_title: "[TICK-7] Add login flow".to_string(),
            }
        );
    }

    #[test]
    fn branch_reference_wins_over_body_reference() {
        let mut ctx = context();
        ctx.branch = "feature/TICK-42-login".to_string();
        ctx.body = Some("closes TICK-99".to_string());

        let decision = decide(&ctx, &config());
        assert_eq!(
            decision,
            Decision::Update {
                source: TicketSource::Branch,
                new_title: "[TICK-42] Add login flow".to_string(),
            }
        );
    }

    #[test]
    fn failed_branch_extraction_is_terminal() {
        let mut config = config();
        // the branch pattern matches, but the ticket pattern cannot pull
        // an identifier out of the branch name
        config.branch_pattern = compile_pattern("hotfix/", "").unwrap();

        let mut ctx = context();
        ctx.branch = "hotfix/login".to_string();
        ctx.body = Some("TICK-7".to_string());

        assert_eq!(
            decide(&ctx, &config),
            Decision::Reject(RejectReason::BranchExtraction)
        );
    }

    #[test]
    fn body_stage_requires_a_body() {
        let ctx = context();
        assert_eq!(
            decide(&ctx, &config()),
            Decision::Reject(RejectReason::MissingBody)
        );
    }

    #[test]
    fn body_match_that_yields_no_identifier_is_fatal() {
        let mut config = config();
        config.body_pattern = compile_pattern(r"ticket: \w+", "").unwrap();
        config.ticket_pattern = compile_pattern(r"\d{4}", "").unwrap();

        let mut ctx = context();
        ctx.body = Some("ticket: pending".to_string());

        assert_eq!(
            decide(&ctx, &config),
            Decision::Reject(RejectReason::BodyExtraction)
        );
    }

    #[test]
    fn body_identifier_is_extracted_from_the_match_not_the_whole_body() {
        let mut config = config();
        config.body_pattern = compile_pattern(r"ref: [A-Z]{2,}-\d+", "").unwrap();

        let mut ctx = context();
        // TICK-1 appears first in the body but outside the body match
        ctx.body = Some("see TICK-1 above, ref: TICK-7".to_string());

        assert_eq!(
            decide(&ctx, &config),
            Decision::Update {
                source: TicketSource::Body,
                new_title: "[TICK-7] Add login flow".to_string(),
            }
        );
    }

    #[test]
    fn nothing_matching_anywhere_rejects() {
        let mut ctx = context();
        ctx.body = Some("no reference here".to_string());

        assert_eq!(
            decide(&ctx, &config()),
            Decision::Reject(RejectReason::NoReference)
        );
    }

    #[test]
    fn stages_advance_in_order() {
        let ctx = context();
        let config = config();

        let state = ResolveState::CheckTitle.step(&ctx, &config);
        assert_eq!(state, ResolveState::CheckExemption);

        let state = state.step(&ctx, &config);
        assert_eq!(state, ResolveState::CheckBranch);

        let state = state.step(&ctx, &config);
        assert_eq!(state, ResolveState::CheckBody);
    }

    #[test]
    fn done_is_absorbing() {
        let ctx = context();
        let done = ResolveState::Done(Decision::Approve);
        assert_eq!(done.clone().step(&ctx, &config()), done);
    }

    #[test]
    fn reject_messages_are_stable() {
        assert_eq!(
            RejectReason::BranchExtraction.message(),
            "could not extract a ticket ID reference from the branch"
        );
        assert_eq!(
            RejectReason::MissingBody.message(),
            "could not retrieve the pull request body"
        );
        assert_eq!(
            RejectReason::BodyExtraction.message(),
            "could not extract a ticket shorthand reference from the body"
        );
        assert_eq!(
            RejectReason::NoReference.message(),
            "no ticket was referenced in this pull request"
        );
    }
}
