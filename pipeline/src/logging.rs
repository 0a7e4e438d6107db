//! Diagnostic tracing for pipeline runs.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: progress and debugging output via `RUST_LOG`,
//!   written to stderr. Not persisted.
//!
//! - **Checkpoint records (`io/config`)**: the `.incfg`/`.outcfg` files under
//!   the run prefix. Always written, unaffected by `RUST_LOG`.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing subscriber for pipeline logging.
///
/// Reads `RUST_LOG` env var. Defaults to `warn` if unset.
/// Output: stderr, compact format.
///
/// # Example
/// ```bash
/// RUST_LOG=pipeline=info pipeline config.toml
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
