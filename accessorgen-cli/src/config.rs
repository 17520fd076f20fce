//! Layered configuration for `accessorgen`.
//!
//! Values are merged lowest to highest precedence: built-in defaults, the
//! TOML configuration file, `ACCESSORGEN_*` environment variables, then
//! command-line flags.

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cli::Args;
use crate::error::CliError;

/// Configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "accessorgen.toml";

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "ACCESSORGEN_CONFIG_PATH";

/// Prefix of environment variables that set configuration keys.
pub const ENV_PREFIX: &str = "ACCESSORGEN_";

/// Environment variable holding the log filter directives.
pub const LOG_ENV: &str = "ACCESSORGEN_LOG";

/// Output directory used when no layer sets one.
pub const DEFAULT_OUT_DIR: &str = "generated";

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Compilation snapshot to read.
    pub snapshot: Option<Utf8PathBuf>,
    /// Directory that receives units and the manifest.
    pub out_dir: Utf8PathBuf,
    /// Reuse existing output when the cache key matches.
    pub cache: bool,
    /// Treat any recorded diagnostic as a failure.
    pub strict: bool,
    /// Plan the run without writing files.
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            snapshot: None,
            out_dir: Utf8PathBuf::from(DEFAULT_OUT_DIR),
            cache: false,
            strict: false,
            dry_run: false,
        }
    }
}

impl GeneratorConfig {
    /// Loads the configuration for `args`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] when a layer is malformed or a value has
    /// the wrong type.
    pub fn load(args: &Args) -> Result<Self, CliError> {
        let file = config_file(args.config_path.as_deref());
        debug!(path = %file, "loading configuration");
        let config: Self = figment(&file, args).extract()?;
        debug!(?config, "configuration merged");
        Ok(config)
    }

    /// The snapshot path, required for every run.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::MissingSnapshot`] when no layer set it.
    pub fn snapshot_path(&self) -> Result<&Utf8Path, CliError> {
        self.snapshot.as_deref().ok_or(CliError::MissingSnapshot)
    }
}

/// Chooses the configuration file: the flag, then the environment, then the
/// working-directory default.
fn config_file(flag: Option<&Utf8Path>) -> Utf8PathBuf {
    flag.map(Utf8Path::to_path_buf)
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().map(Utf8PathBuf::from))
        .unwrap_or_else(|| Utf8PathBuf::from(CONFIG_FILE_NAME))
}

fn figment(file: &Utf8Path, args: &Args) -> Figment {
    Figment::from(Serialized::defaults(GeneratorConfig::default()))
        .merge(Toml::file(file.as_std_path()))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["log", "config_path"]))
        .merge(Serialized::defaults(args.overrides()))
}
