use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Initialize structured logging for a run. JSON output keeps log lines
/// machine-readable without interfering with workflow commands, which go
/// through the diagnostics sink instead.
pub fn init_telemetry() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    Ok(())
}

/// Correlation id for linking a run's log lines.
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}
