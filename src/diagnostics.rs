//! Diagnostics sink for workflow runs.

use tracing::{debug, error};

/// Observability and failure marking, decoupled from the resolver so
/// tests can capture exactly what a run reported.
pub trait Diagnostics: Send + Sync {
    /// Emit a labeled debug message (visible when step debug logging is
    /// enabled on the runner).
    fn debug(&self, label: &str, message: &str);

    /// Report a fatal condition and mark the run as failed, without
    /// raising.
    fn fail(&self, message: &str);
}

/// Emits GitHub Actions workflow commands on stdout, mirrored through
/// `tracing` for structured logs.
#[derive(Debug, Default)]
pub struct WorkflowCommands;

impl Diagnostics for WorkflowCommands {
    fn debug(&self, label: &str, message: &str) {
        debug!(label, "{message}");
        println!("::debug::{}: {}", escape_data(label), escape_data(message));
    }

    fn fail(&self, message: &str) {
        error!("{message}");
        println!("::error::{}", escape_data(message));
    }
}

// `%`, CR and LF would otherwise terminate the workflow command payload.
fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
