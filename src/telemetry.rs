use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Initialize structured logging for host applications embedding the
/// workflow. JSON output with span context, filterable via RUST_LOG.
pub fn init_telemetry() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("editflow telemetry initialized with structured logging");
    Ok(())
}

/// Generate a correlation ID for linking one submission's log events
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Create a span covering one update-submission invocation
pub fn create_update_span(
    entity: &str,
    action: &str,
    selector: &str,
    correlation_id: &str,
) -> tracing::Span {
    tracing::info_span!(
        "update_submission",
        entity = entity,
        action = action,
        selector = selector,
        correlation.id = correlation_id,
    )
}

/// Shutdown telemetry gracefully
pub fn shutdown_telemetry() {
    tracing::info!("editflow telemetry shutdown complete");
}
