//! Run event logging and tracing setup

pub mod jsonl_observer;

pub use jsonl_observer::JsonlRunObserver;

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Verbosity maps to a default filter (`0` = warn, `1` = info, `2` =
/// debug, anything higher = trace); `RUST_LOG` overrides it when set.
/// Events go to stderr so stdout stays clean for results.
pub fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
