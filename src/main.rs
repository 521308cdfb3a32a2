use std::process::ExitCode;

use clap::Parser;

use pr_ticket_check::context::PullRequestContext;
use pr_ticket_check::diagnostics::{Diagnostics, WorkflowCommands};
use pr_ticket_check::github::GitHubClient;
use pr_ticket_check::inputs::{self, ActionInputs, ResolverConfig};
use pr_ticket_check::resolver::{Outcome, TicketResolver};
use pr_ticket_check::telemetry;

fn main() -> ExitCode {
    let diagnostics = WorkflowCommands;

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(err) => {
            diagnostics.fail(&err.to_string());
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(&diagnostics)) {
        Ok(Outcome::Rejected) => ExitCode::FAILURE,
        Ok(_) => ExitCode::SUCCESS,
        // single top-level catch: anything the stages did not guard ends
        // up as one failure-marking call
        Err(err) => {
            diagnostics.fail(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

async fn run(diagnostics: &dyn Diagnostics) -> anyhow::Result<Outcome> {
    inputs::load_env_file();
    telemetry::init_telemetry()?;

    let run_id = telemetry::generate_run_id();

    let raw = ActionInputs::try_parse()?;
    let config = ResolverConfig::from_inputs(&raw)?;
    let ctx = PullRequestContext::from_env()?;

    tracing::info!(
        run.id = %run_id,
        owner = %ctx.owner,
        repo = %ctx.repo,
        number = ctx.number,
        "checking pull request for a ticket reference"
    );

    let client = GitHubClient::new(raw.token.clone(), ctx.owner.clone(), ctx.repo.clone())?;
    let resolver = TicketResolver::new(config);
    let outcome = resolver.resolve(&ctx, &client, diagnostics).await?;

    tracing::info!(run.id = %run_id, ?outcome, "run complete");
    Ok(outcome)
}
