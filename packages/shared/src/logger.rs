//! Logging setup utilities for the Calypso workspace.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// Diagnostics are written to stderr so that stdout stays reserved for the
/// session log shown to the user. The log level can be overridden using the
/// `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "calypso-client")
/// * `default_log_level` - The default log level (e.g., "debug", "info", "warn", "error")
///
/// # Examples
///
/// ```no_run
/// use calypso_shared::logger::setup_logger;
///
/// setup_logger("calypso-client", "debug");
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Build the filter directive used when `RUST_LOG` is not set.
fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    let binary_target = binary_name.replace('-', "_");
    let mut directives = vec![format!(
        "{}={}",
        env!("CARGO_PKG_NAME").replace('-', "_"),
        default_log_level
    )];
    if binary_target != env!("CARGO_PKG_NAME").replace('-', "_") {
        directives.push(format!("{}={}", binary_target, default_log_level));
    }
    directives.join(",")
}
