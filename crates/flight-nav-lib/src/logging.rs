/*!
Logging setup for hosts that embed the navigation database.

The library itself only emits `tracing` events. Binaries, benches and tests that
want to see them call [`setup_logging`] once at startup.

`RUST_LOG` controls the filter when set; otherwise the default is
`info,flight_nav_lib=info`.
*/

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Default filter directive when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,flight_nav_lib=info";

/// Install a global fmt subscriber filtered by `RUST_LOG`
///
/// Returns `false` when a global subscriber was already installed (for example by a
/// previous call or by the host application); the existing one is left in place.
pub fn setup_logging() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = fmt::layer().with_target(true).with_filter(filter);
    let installed = tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!("Logging initialized");
    }
    installed
}
