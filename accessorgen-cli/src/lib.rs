//! Library interface for the `accessorgen` command-line tool.
//!
//! The tool reads a serialized compilation snapshot, runs one generation
//! pass, and writes each unit plus a `manifest.json` into an output
//! directory. Settings are layered from defaults, `accessorgen.toml`,
//! `ACCESSORGEN_*` environment variables, and flags.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
mod fs_helpers;
pub mod logging;
pub mod output;

use accessorgen::{CompilationSnapshot, Generator, SCHEMA_VERSION};
use tracing::{info, warn};

use crate::cache::{CacheKey, Manifest};
use crate::cli::Args;
use crate::config::GeneratorConfig;
use crate::error::CliError;

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Units were generated and written.
    Written(Manifest),
    /// Existing output matched the cache key and was reused.
    Cached(Manifest),
    /// Units were generated but not written.
    Planned(Manifest),
}

impl Outcome {
    /// The manifest describing the run's units.
    #[must_use]
    pub const fn manifest(&self) -> &Manifest {
        match self {
            Self::Written(manifest) | Self::Cached(manifest) | Self::Planned(manifest) => manifest,
        }
    }
}

/// Runs the tool for `args`.
///
/// # Errors
///
/// Returns a [`CliError`] when configuration, the snapshot, or output I/O
/// fails, or when strict mode sees a recorded diagnostic.
pub fn run(args: &Args) -> Result<Outcome, CliError> {
    let config = GeneratorConfig::load(args)?;
    run_with_config(&config)
}

/// Runs the tool with an already merged configuration.
///
/// # Errors
///
/// See [`run`].
pub fn run_with_config(config: &GeneratorConfig) -> Result<Outcome, CliError> {
    let snapshot_path = config.snapshot_path()?;
    let json = fs_helpers::read_to_string(snapshot_path)?;
    let snapshot = CompilationSnapshot::from_json(&json).map_err(|source| CliError::Snapshot {
        path: snapshot_path.to_path_buf(),
        source,
    })?;
    let cache_key = CacheKey::new(
        snapshot.fingerprint().map_err(CliError::Fingerprint)?,
        env!("CARGO_PKG_VERSION").to_owned(),
        SCHEMA_VERSION.to_owned(),
    )
    .hash();

    if config.cache
        && !config.dry_run
        && let Some(manifest) = cache::cached_manifest(&config.out_dir, &cache_key)?
    {
        info!(out_dir = %config.out_dir, "snapshot unchanged; reusing output");
        reject_in_strict_mode(config, manifest.diagnostics.len())?;
        return Ok(Outcome::Cached(manifest));
    }

    let output = Generator::new(&snapshot.facts).generate(&snapshot.trees);
    for diagnostic in &output.diagnostics {
        warn!(
            code = diagnostic.kind.code(),
            owner = diagnostic.owner.as_deref().unwrap_or_default(),
            field = diagnostic.field.as_deref().unwrap_or_default(),
            "{}",
            diagnostic.message
        );
    }
    reject_in_strict_mode(config, output.diagnostics.len())?;

    if config.dry_run {
        return Ok(Outcome::Planned(Manifest::describe(&cache_key, &output)));
    }
    output::write_units(&config.out_dir, &output, &cache_key).map(Outcome::Written)
}

const fn reject_in_strict_mode(config: &GeneratorConfig, count: usize) -> Result<(), CliError> {
    if config.strict && count > 0 {
        Err(CliError::Strict { count })
    } else {
        Ok(())
    }
}
