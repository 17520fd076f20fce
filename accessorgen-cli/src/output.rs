//! Output writers for `accessorgen`.

use std::collections::HashSet;
use std::io::{ErrorKind, Write};

use camino::Utf8Path;
use cap_std::fs_utf8::{Dir, OpenOptions};
use tracing::{debug, info};

use accessorgen::GenerationOutput;

use crate::cache::{MANIFEST_FILE_NAME, Manifest, read_manifest};
use crate::error::CliError;
use crate::fs_helpers::ensure_dir;

/// Writes every unit of `output` into `out_dir`, followed by the manifest.
///
/// Units listed by the previous manifest but absent from `output` are
/// removed. The manifest is written last so an interrupted run never leaves
/// a manifest that names missing units.
///
/// # Errors
///
/// Returns [`CliError::Io`] when the directory or a file cannot be written
/// and [`CliError::Json`] when the manifest cannot be encoded.
pub fn write_units(
    out_dir: &Utf8Path,
    output: &GenerationOutput,
    cache_key: &str,
) -> Result<Manifest, CliError> {
    let dir = ensure_dir(out_dir)?;
    let previous = read_manifest(&dir);
    for unit in &output.units {
        write_file(&dir, out_dir, &unit.name, &unit.source)?;
        debug!(unit = %unit.name, bytes = unit.source.len(), "unit written");
    }
    if let Some(previous) = previous {
        remove_stale_units(&dir, out_dir, &previous, output)?;
    }

    let manifest = Manifest::describe(cache_key, output);
    let content = serde_json::to_string_pretty(&manifest)?;
    write_file(&dir, out_dir, MANIFEST_FILE_NAME, &content)?;
    info!(%out_dir, units = manifest.units.len(), "output written");
    Ok(manifest)
}

/// Deletes the units `previous` lists that `output` no longer produces.
fn remove_stale_units(
    dir: &Dir,
    out_dir: &Utf8Path,
    previous: &Manifest,
    output: &GenerationOutput,
) -> Result<(), CliError> {
    let current: HashSet<&str> = output
        .units
        .iter()
        .map(|unit| unit.name.as_str())
        .collect();
    let stale = previous
        .units
        .iter()
        .filter(|name| name.as_str() != MANIFEST_FILE_NAME && !current.contains(name.as_str()));
    for name in stale {
        match dir.remove_file(name) {
            Ok(()) => debug!(unit = %name, "stale unit removed"),
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(CliError::io(out_dir.join(name), err)),
        }
    }
    Ok(())
}

fn write_file(dir: &Dir, out_dir: &Utf8Path, name: &str, content: &str) -> Result<(), CliError> {
    let path = out_dir.join(name);
    let mut file = dir
        .open_with(
            name,
            OpenOptions::new().write(true).create(true).truncate(true),
        )
        .map_err(|err| CliError::io(&path, err))?;
    file.write_all(content.as_bytes())
        .map_err(|err| CliError::io(&path, err))
}
