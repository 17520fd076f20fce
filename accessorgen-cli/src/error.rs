//! Error types for the `accessorgen` command-line tool.

use accessorgen::SnapshotError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors surfaced by the `accessorgen` pipeline.
#[derive(Debug, Error)]
pub enum CliError {
    /// No snapshot path was configured in any layer.
    #[error("no snapshot given; pass --snapshot or set ACCESSORGEN_SNAPSHOT")]
    MissingSnapshot,

    /// Layered configuration could not be merged or extracted.
    #[error("failed to load configuration: {0}")]
    Config(Box<figment::Error>),

    /// The snapshot file was not a valid compilation snapshot.
    #[error("invalid snapshot {path}: {source}")]
    Snapshot {
        /// Snapshot file path.
        path: Utf8PathBuf,
        /// Underlying parse or validation failure.
        #[source]
        source: SnapshotError,
    },

    /// The snapshot could not be fingerprinted for the cache key.
    #[error("failed to fingerprint snapshot: {0}")]
    Fingerprint(#[source] SnapshotError),

    /// The manifest could not be encoded.
    #[error("failed to encode manifest: {0}")]
    Json(#[from] serde_json::Error),

    /// A filesystem operation failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path the operation targeted.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Strict mode rejected a pass that recorded diagnostics.
    #[error("strict mode: {count} diagnostic(s) recorded")]
    Strict {
        /// Number of recorded diagnostics.
        count: usize,
    },

    /// The log subscriber could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Wraps an I/O failure with the path it concerned.
    #[must_use]
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
