//! Subscriber setup for the `stoneage` binary.
//!
//! Without `RUST_LOG`, only the companion's own crates log at the requested
//! level; dependencies stay at `warn`. Output always goes to stderr so stdout
//! carries nothing but command results.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Targets that follow the `--verbose` / config log level.
const COMPANION_TARGETS: [&str; 3] = ["stoneage_core", "stoneage_store", "stoneage"];

/// Filter directive used when `RUST_LOG` is absent or unparsable.
pub fn default_directive(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    COMPANION_TARGETS
        .iter()
        .fold(String::from("warn"), |mut acc, target| {
            acc.push(',');
            acc.push_str(target);
            acc.push('=');
            acc.push_str(&level);
            acc
        })
}

/// Install the global subscriber, JSON lines when `json` is set.
///
/// Returns `false` when a subscriber was already installed; the existing one
/// is kept.
pub fn init_tracing(json: bool, level: Level) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    let (text_layer, json_layer) = if json {
        let layer = fmt::layer()
            .json()
            .with_current_span(false)
            .with_writer(std::io::stderr);
        (None, Some(layer))
    } else {
        let layer = fmt::layer().compact().with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()
        .is_ok()
}
