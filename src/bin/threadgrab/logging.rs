//! Tracing setup for the command-line binary.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level is `info`, or `debug` (HTTP client
/// included) with `--verbose`.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {e}"))
}

fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "debug,ureq=debug"
    } else {
        "info,ureq=warn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_enables_debug_directives() {
        assert!(default_directives(true).starts_with("debug"));
        assert!(default_directives(false).starts_with("info"));
    }
}
