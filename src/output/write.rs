use std::{
    fs,
    io::{self, Write},
    path::Path,
};
use tracing::info;

use crate::error::Result;

/// Replace `path` with `bytes` in one step.
///
/// - creates the parent directory if needed
/// - writes `.<name>.tmp` next to the target
/// - renames it over the target, so readers see the old file or the new one
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .map_err(|e| io::Error::new(e.kind(), format!("creating {:?}: {}", dir, e)))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("output path {:?} has no file name", path),
            )
        })?
        .to_string_lossy();
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let mut tmp = fs::File::create(&tmp_path)
        .map_err(|e| io::Error::new(e.kind(), format!("creating {:?}: {}", tmp_path, e)))?;
    tmp.write_all(bytes)?;
    tmp.sync_all()?;
    drop(tmp);

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        io::Error::new(
            e.kind(),
            format!("renaming {:?} -> {:?}: {}", tmp_path, path, e),
        )
    })?;

    info!("Output written to {}", path.display());
    Ok(())
}
