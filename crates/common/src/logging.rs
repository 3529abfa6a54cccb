use crate::config::Environment;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, util::TryInitError};

/// Initialize tracing subscriber with pretty formatting for development
/// and JSON formatting for production.
///
/// Uses RUST_LOG environment variable for filtering (defaults to "info" if not set).
///
/// Also adds an OpenTelemetry layer, which forwards spans to whatever global
/// tracer provider the host process has installed.
///
/// Fails if a global subscriber is already set.
pub fn try_setup_logging(environment: Environment) -> Result<(), TryInitError> {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let otel_layer = tracing_opentelemetry::layer();

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer);

    match environment {
        Environment::Production => registry
            .with(tracing_subscriber::fmt::layer().json().with_level(true))
            .try_init(),
        Environment::Development => registry
            .with(tracing_subscriber::fmt::layer().pretty().with_ansi(true))
            .try_init(),
    }
}

/// Like [`try_setup_logging`], but keeps an already-installed subscriber.
///
/// Host runtimes usually own the global subscriber; calling this from a
/// library entry point must not clobber it.
pub fn setup_logging(environment: Environment) {
    if try_setup_logging(environment).is_err() {
        tracing::debug!(
            environment = environment.as_str(),
            "Global subscriber already installed, keeping it"
        );
    }
}
