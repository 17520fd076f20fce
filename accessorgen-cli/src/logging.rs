//! Log subscriber setup for the `accessorgen` binary.

use tracing_subscriber::EnvFilter;

use crate::config::LOG_ENV;
use crate::error::CliError;

/// Builds the filter: `ACCESSORGEN_LOG` when set, otherwise `debug` for
/// verbose runs and `warn` for the rest.
#[must_use]
pub fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "warn" };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs a `fmt` subscriber writing to standard error.
///
/// # Errors
///
/// Returns [`CliError::Logging`] when a global subscriber is already set.
pub fn init(verbose: bool) -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|err| CliError::Logging(err.to_string()))
}
