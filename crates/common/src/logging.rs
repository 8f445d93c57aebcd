use std::io::IsTerminal;

use tracing_subscriber::{fmt, EnvFilter};

/// Installs the stderr subscriber once. `RUST_LOG` takes precedence over
/// `default_level`; colours are disabled for non-terminal stderr (CI builds)
/// and when `NO_COLOR` is set.
pub fn init_logging(default_level: &str) {
    if tracing::dispatcher::has_been_set() {
        return;
    }

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let ansi = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();

    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_ansi(ansi)
        .with_writer(std::io::stderr)
        .try_init();
}
