//! Diagnostic logging.
//!
//! Standard output belongs to the conversation, so log records go to standard
//! error.  The level defaults to `warn` and can be raised with `RUST_LOG`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Level used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Library modules kept at `warn` regardless of the base level.
const NOISY_MODULES: &[&str] = &["hyper", "reqwest", "h2", "rustls", "rustyline"];

fn build_filter(log_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let mut directives = String::from(log_level);
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    EnvFilter::new(directives)
}

/// Installs the global subscriber.  Calling it twice is harmless.
pub fn init_logging(log_level: &str) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);
    let _ = tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(fmt_layer)
        .try_init();
}
