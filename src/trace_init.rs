use std::sync::OnceLock;

use tracing::warn;
use tracing_subscriber::EnvFilter;

static INIT_GUARD: OnceLock<bool> = OnceLock::new();

/// Level used when `RUST_LOG` is unset, from the number of `-v` flags.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Ensures tracing has been initialised for the current process.
///
/// Logs go to stderr so PNG/TOML output on stdout stays clean.
pub fn init_tracing(verbosity: u8) {
    let installed = INIT_GUARD.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .is_ok()
    });

    if !installed {
        warn!("tracing subscriber was already installed elsewhere");
    }
}
