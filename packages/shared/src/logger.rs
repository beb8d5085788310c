//! Tracing subscriber setup shared by the server and client binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise the binary itself and the relay
/// library crates log at `default_level`.
///
/// # Arguments
///
/// * `bin_name` - Name of the running binary (usually `env!("CARGO_BIN_NAME")`)
/// * `default_level` - Level used when `RUST_LOG` is not set (e.g. `"info"`)
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    // A subscriber may already be installed (e.g. by tests); keep it.
    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .try_init()
        .is_ok()
    {
        tracing::debug!("Logger initialized for {}", bin_name);
    }
}

/// Library crates whose logs follow the binary's default level.
const LIBRARY_TARGETS: &[&str] = &["relay_server", "relay_client"];

fn default_directives(bin_name: &str, default_level: &str) -> String {
    let bin_target = bin_name.replace('-', "_");
    let mut targets = vec![bin_target.as_str()];
    targets.extend(
        LIBRARY_TARGETS
            .iter()
            .copied()
            .filter(|target| *target != bin_target),
    );
    targets
        .iter()
        .map(|target| format!("{target}={default_level}"))
        .collect::<Vec<_>>()
        .join(",")
}
