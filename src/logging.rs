//! Diagnostic logging setup shared by both binaries.
//!
//! Status lines meant for the user go to stdout with `println!`; tracing
//! events go to stderr and are silent below `warn` unless asked for.
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "TRACKER_TOOLS_LOG";

/// Pick the filter: `TRACKER_TOOLS_LOG` wins, then `--verbose`, then `warn`.
pub fn filter_directive(env_value: Option<&str>, verbose: bool) -> String {
    match env_value.map(str::trim).filter(|value| !value.is_empty()) {
        Some(value) => value.to_string(),
        None if verbose => "debug".to_string(),
        None => "warn".to_string(),
    }
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let env_value = std::env::var(LOG_ENV).ok();
    let directive = filter_directive(env_value.as_deref(), verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
