//! Telemetry helpers for viewers embedding `spectro-view`.
//!
//! Tracing setup stays explicit and opt-in. Hosts either call
//! `init_default_tracing` or install their own `tracing` subscriber; the engine
//! only emits events, all under the `spectro_view` target:
//!
//! - `warn`: malformed or rejected frames, compute-service errors, refused tile
//!   uploads and the placeholder fallback, failed channel redraws.
//! - `info`: compute-service information messages.
//! - `debug`: declared datasets and layouts, tile rebuilds, sample updates, placeholder
//!   installs, stale responses, ignored message types, outbound requests,
//!   display option changes, viewer construction.
//! - `trace`: per-event wheel handling, redraw requests and completed draws,
//!   in-place tile refills.

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// The filter comes from `RUST_LOG` when set, otherwise `spectro_view=info`,
/// which shows warnings and service information but not per-frame detail.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when no initialization is performed (feature disabled) or if a
/// global subscriber was already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("spectro_view=info")),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
