//! Cache key and manifest helpers for `accessorgen`.
//!
//! A run's cache key hashes the snapshot fingerprint with the tool and schema
//! versions. The key is stored in `manifest.json` next to the units, and a
//! later run with the same key and all units still present skips generation.

use camino::Utf8Path;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use accessorgen::GenerationOutput;

use crate::error::CliError;
use crate::fs_helpers::open_optional_dir;

/// Name of the manifest written alongside the units.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Cache key inputs for one run.
#[derive(Debug, Clone)]
pub struct CacheKey {
    fingerprint: String,
    tool_version: String,
    schema_version: String,
}

impl CacheKey {
    /// Creates a new cache key input set.
    #[must_use]
    pub const fn new(fingerprint: String, tool_version: String, schema_version: String) -> Self {
        Self {
            fingerprint,
            tool_version,
            schema_version,
        }
    }

    /// Hashes the cache inputs into a stable identifier.
    #[must_use]
    pub fn hash(&self) -> String {
        let mut hasher = Sha256::new();
        for part in [&self.fingerprint, &self.tool_version, &self.schema_version] {
            hasher.update(part.as_bytes());
            hasher.update([0]);
        }
        format!("{:x}", hasher.finalize())
    }
}

/// Record of the units a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Hashed [`CacheKey`] of the run.
    pub cache_key: String,
    /// Unit names in emission order.
    pub units: Vec<String>,
    /// Rendered diagnostics recorded by the pass.
    #[serde(default)]
    pub diagnostics: Vec<String>,
}

impl Manifest {
    /// Describes `output` under `cache_key`.
    #[must_use]
    pub fn describe(cache_key: &str, output: &GenerationOutput) -> Self {
        Self {
            cache_key: cache_key.to_owned(),
            units: output.units.iter().map(|unit| unit.name.clone()).collect(),
            diagnostics: output.diagnostics.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Returns the manifest in `out_dir` when it matches `cache_key` and every
/// unit it lists still exists.
///
/// A missing or unreadable manifest is a cache miss, not an error.
///
/// # Errors
///
/// Returns [`CliError::Io`] when `out_dir` exists but cannot be opened.
pub fn cached_manifest(out_dir: &Utf8Path, cache_key: &str) -> Result<Option<Manifest>, CliError> {
    let Some(dir) = open_optional_dir(out_dir)? else {
        debug!(%out_dir, "cache miss: no output directory");
        return Ok(None);
    };
    let Some(manifest) = read_manifest(&dir) else {
        debug!(%out_dir, "cache miss: no readable manifest");
        return Ok(None);
    };
    if manifest.cache_key != cache_key {
        debug!(%out_dir, "cache miss: key changed");
        return Ok(None);
    }
    if let Some(missing) = manifest.units.iter().find(|unit| !dir.is_file(unit)) {
        debug!(%out_dir, unit = %missing, "cache miss: unit removed");
        return Ok(None);
    }
    Ok(Some(manifest))
}

/// Reads the manifest in `dir`, treating a missing or corrupt file as absent.
pub(crate) fn read_manifest(dir: &Dir) -> Option<Manifest> {
    let text = dir.read_to_string(MANIFEST_FILE_NAME).ok()?;
    serde_json::from_str(&text).ok()
}

#[cfg(test)]
mod tests {
    //! Tests for cache keys and manifest lookup.

    use super::*;
    use crate::output::write_units;
    use accessorgen::GeneratedUnit;
    use anyhow::{Context, Result};
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};

    fn key(fingerprint: &str, tool: &str, schema: &str) -> String {
        CacheKey::new(fingerprint.to_owned(), tool.to_owned(), schema.to_owned()).hash()
    }

    #[fixture]
    fn output() -> GenerationOutput {
        GenerationOutput {
            units: vec![GeneratedUnit::new("Player.g.cs", "// <auto-generated/>\n")],
            diagnostics: Vec::new(),
        }
    }

    fn temp_out_dir() -> Result<(tempfile::TempDir, Utf8PathBuf)> {
        let tempdir = tempfile::tempdir()?;
        let root = Utf8PathBuf::from_path_buf(tempdir.path().join("out"))
            .map_err(|path| anyhow::anyhow!("non UTF-8 temp path {}", path.display()))?;
        Ok((tempdir, root))
    }

    #[rstest]
    #[case(("a", "0.3.0", "1"), ("b", "0.3.0", "1"))]
    #[case(("a", "0.3.0", "1"), ("a", "0.4.0", "1"))]
    #[case(("a", "0.3.0", "1"), ("a", "0.3.0", "2"))]
    #[case(("ab", "c", "1"), ("a", "bc", "1"))]
    fn every_input_changes_the_key(
        #[case] first: (&str, &str, &str),
        #[case] second: (&str, &str, &str),
    ) {
        assert_ne!(
            key(first.0, first.1, first.2),
            key(second.0, second.1, second.2)
        );
    }

    #[rstest]
    fn key_is_stable() {
        assert_eq!(key("a", "b", "c"), key("a", "b", "c"));
    }

    #[rstest]
    fn missing_directory_is_a_miss() -> Result<()> {
        let (_guard, root) = temp_out_dir()?;
        assert!(cached_manifest(&root, "key")?.is_none());
        Ok(())
    }

    #[rstest]
    fn matching_manifest_is_a_hit(output: GenerationOutput) -> Result<()> {
        let (_guard, root) = temp_out_dir()?;
        write_units(&root, &output, "key")?;
        let manifest = cached_manifest(&root, "key")?.context("expected a cache hit")?;
        assert_eq!(manifest.units, ["Player.g.cs"]);
        Ok(())
    }

    #[rstest]
    fn changed_key_is_a_miss(output: GenerationOutput) -> Result<()> {
        let (_guard, root) = temp_out_dir()?;
        write_units(&root, &output, "old")?;
        assert!(cached_manifest(&root, "new")?.is_none());
        Ok(())
    }

    #[rstest]
    fn deleted_unit_is_a_miss(output: GenerationOutput) -> Result<()> {
        let (_guard, root) = temp_out_dir()?;
        write_units(&root, &output, "key")?;
        std::fs::remove_file(root.join("Player.g.cs"))?;
        assert!(cached_manifest(&root, "key")?.is_none());
        Ok(())
    }

    #[rstest]
    fn corrupt_manifest_is_a_miss() -> Result<()> {
        let (_guard, root) = temp_out_dir()?;
        std::fs::create_dir_all(&root)?;
        std::fs::write(root.join(MANIFEST_FILE_NAME), "{not json")?;
        assert!(cached_manifest(&root, "key")?.is_none());
        Ok(())
    }
}
