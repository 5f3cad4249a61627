use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the log subscriber and report the library version.
///
/// Call once at startup; later calls are no-ops. `RUST_LOG` overrides the
/// default `info` level.
pub fn init() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        // A subscriber installed by the host application wins.
        let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
        tracing::info!(version = env!("CARGO_PKG_VERSION"), "labelgrid initialised");
    });
}
