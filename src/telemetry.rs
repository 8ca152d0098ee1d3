//! Opt-in tracing setup for hosts embedding `explore-charts`.
//!
//! Library code only emits `tracing` events. Installing a subscriber is
//! left to the host; the helpers here cover the common case of a batch
//! export run that wants readable console output without wiring
//! `tracing-subscriber` by hand.

/// Default filter directive used when `RUST_LOG` is not set.
///
/// Config merging and data binding log at `debug`, so the default keeps
/// the crate itself at `info` to stay quiet during large export runs.
pub const DEFAULT_LOG_FILTER: &str = "info,explore_charts=info";

/// Installs a compact console subscriber honoring `RUST_LOG`.
///
/// Equivalent to `init_tracing_with(DEFAULT_LOG_FILTER)`.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with(DEFAULT_LOG_FILTER)
}

/// Installs a compact console subscriber with `fallback` as the filter
/// when `RUST_LOG` is unset.
///
/// Returns `false` without side effects when the `telemetry` feature is
/// disabled, or when the host already installed a global subscriber.
#[must_use]
pub fn init_tracing_with(fallback: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback));

        return tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .try_init()
            .is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = fallback;
        false
    }
}
