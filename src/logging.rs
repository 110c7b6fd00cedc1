use tracing_subscriber::filter::EnvFilter;

use crate::error::{Result, VersionError};

/// Environment variable that overrides the log filter
pub const LOG_ENV: &str = "GITFLOW_VERSION_LOG";

/// Filter directive for a `-v` count: warn, info, then debug
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Initialize the tracing subscriber once at process start.
///
/// `GITFLOW_VERSION_LOG` wins, then `RUST_LOG`, then the verbosity default.
/// Output goes to stderr so stdout only carries the version.
pub fn init_tracing(verbosity: u8) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) => EnvFilter::try_new(&directive).unwrap_or_else(|err| {
            eprintln!(
                "invalid {} directive ({}); using {}",
                LOG_ENV,
                err,
                default_directive(verbosity)
            );
            EnvFilter::new(default_directive(verbosity))
        }),
        Err(_) => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity))),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| VersionError::config(format!("Cannot initialise logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(0), "warn");
        assert_eq!(default_directive(1), "info");
        assert_eq!(default_directive(5), "debug");
    }
}
