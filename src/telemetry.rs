//! Tracing setup for binaries and demos
//!
//! The library only emits `tracing` events; nothing is printed unless the
//! application installs a subscriber, e.g. with [`init_tracing`].

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "storedesk=info";

/// Install a formatting subscriber filtered by `RUST_LOG`
///
/// Falls back to `default_filter` when `RUST_LOG` is missing or invalid.
/// Calling it twice is harmless; the second call leaves the first
/// subscriber in place.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
