//! Hand-off of generated units to the file system.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::GenerationUnit;

/// Writes every unit to `dir/<file_name>` and returns the paths.
///
/// Files whose contents are already identical are left untouched so their
/// modification time does not trigger rebuilds.
pub fn write_units(units: &[GenerationUnit], dir: &Path) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(units.len());

    for unit in units {
        let path = dir.join(&unit.file_name);
        let unchanged = fs::read_to_string(&path).is_ok_and(|existing| existing == unit.source);
        if unchanged {
            debug!(path = %path.display(), "generated unit unchanged");
        } else {
            fs::write(&path, &unit.source)?;
            debug!(path = %path.display(), "wrote generated unit");
        }
        paths.push(path);
    }

    Ok(paths)
}
