//! Command-line interface definitions for `accessorgen`.

use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser};
use serde::Serialize;

/// Parsed CLI arguments for `accessorgen`.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "accessorgen")]
#[command(about = "Generate memoized hierarchy accessors from a compilation snapshot")]
#[command(version)]
pub struct Args {
    /// Compilation snapshot (JSON) to generate from.
    #[arg(long, value_name = "file.json")]
    pub snapshot: Option<Utf8PathBuf>,
    /// Output directory for generated units.
    #[arg(long, value_name = "path")]
    pub out_dir: Option<Utf8PathBuf>,
    /// Configuration file to load instead of `accessorgen.toml`.
    #[arg(long, value_name = "path")]
    pub config_path: Option<Utf8PathBuf>,
    /// Behaviour switches.
    #[command(flatten)]
    pub switches: Switches,
    /// Log stage progress at debug level.
    #[arg(long, short)]
    pub verbose: bool,
}

/// Behaviour switches that can also come from the file or environment.
#[derive(Debug, Clone, Copy, Default, ClapArgs)]
pub struct Switches {
    /// Reuse existing output when the snapshot is unchanged.
    #[arg(long = "cache")]
    pub should_cache: bool,
    /// Fail when the pass records any diagnostic.
    #[arg(long = "strict")]
    pub is_strict: bool,
    /// Report the units that would be written without writing them.
    #[arg(long = "dry-run")]
    pub is_dry_run: bool,
}

/// The command-line layer of the configuration.
///
/// Only values the user actually supplied are serialized, so an absent flag
/// never masks a value from the file or environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CliOverrides {
    /// `--snapshot`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Utf8PathBuf>,
    /// `--out-dir`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<Utf8PathBuf>,
    /// `--cache`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,
    /// `--strict`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
    /// `--dry-run`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dry_run: Option<bool>,
}

impl Args {
    /// Returns the values supplied on the command line.
    #[must_use]
    pub fn overrides(&self) -> CliOverrides {
        let set = |flag: bool| flag.then_some(true);
        CliOverrides {
            snapshot: self.snapshot.clone(),
            out_dir: self.out_dir.clone(),
            cache: set(self.switches.should_cache),
            strict: set(self.switches.is_strict),
            dry_run: set(self.switches.is_dry_run),
        }
    }
}
