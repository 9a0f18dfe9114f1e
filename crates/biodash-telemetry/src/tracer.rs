//! Tracer setup and management

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::TracerProvider;
use std::sync::{Arc, OnceLock};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Global tracer provider holder
static TRACER_PROVIDER: OnceLock<Arc<TracerProvider>> = OnceLock::new();

/// Initialize logging and OpenTelemetry tracing.
///
/// This sets up:
/// - A tracer provider feeding the `tracing-opentelemetry` layer
/// - Structured log output on stderr
/// - Filtering from `RUST_LOG`, or `default_filter` when it is unset
///
/// Calling it more than once is harmless; only the first call installs the
/// subscriber.
///
/// # Example
///
/// ```rust,no_run
/// use biodash_telemetry::init_telemetry;
///
/// init_telemetry("info");
/// ```
pub fn init_telemetry(default_filter: &str) {
    if TRACER_PROVIDER.get().is_some() {
        return;
    }

    let tracer_provider = TracerProvider::builder().build();
    let tracer = tracer_provider.tracer(crate::attributes::SYSTEM_NAME);

    // Store provider globally
    let _ = TRACER_PROVIDER.set(Arc::new(tracer_provider));

    let telemetry_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let installed = tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_line_number(true),
        )
        .with(filter)
        .try_init();

    if let Err(e) = installed {
        tracing::debug!(error = %e, "Tracing subscriber already installed");
    }
}

/// Get the global tracer provider if initialized
pub fn tracer_provider() -> Option<Arc<TracerProvider>> {
    TRACER_PROVIDER.get().cloned()
}

/// Flush and shut down the tracer provider, if one was installed.
pub fn shutdown_telemetry() {
    if let Some(provider) = tracer_provider()
        && let Err(e) = provider.shutdown()
    {
        tracing::warn!(error = %e, "Failed to shut down tracer provider");
    }
}
