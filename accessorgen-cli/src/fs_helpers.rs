//! Filesystem helpers shared across `accessorgen` modules.

use std::io;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::CliError;

/// Opens a directory if it exists, returning `None` when the path is missing.
pub fn open_optional_dir(path: &Utf8Path) -> Result<Option<Dir>, CliError> {
    match Dir::open_ambient_dir(path, ambient_authority()) {
        Ok(dir) => Ok(Some(dir)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(CliError::io(path, err)),
    }
}

/// Opens a directory, creating it and any missing parents first.
pub fn ensure_dir(path: &Utf8Path) -> Result<Dir, CliError> {
    if let Some(dir) = open_optional_dir(path)? {
        return Ok(dir);
    }
    Dir::create_ambient_dir_all(path, ambient_authority()).map_err(|err| CliError::io(path, err))?;
    Dir::open_ambient_dir(path, ambient_authority()).map_err(|err| CliError::io(path, err))
}

/// Reads a UTF-8 file through a capability on its parent directory.
pub fn read_to_string(path: &Utf8Path) -> Result<String, CliError> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let Some(file_name) = path.file_name() else {
        let err = io::Error::new(io::ErrorKind::InvalidInput, "path has no file name");
        return Err(CliError::io(path, err));
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|err| CliError::io(parent, err))?;
    dir.read_to_string(file_name)
        .map_err(|err| CliError::io(path, err))
}
