// src/discover.rs

use glob::{glob, Pattern};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Find the input table: the first `*.<extension>` file in `dir`, by path order.
///
/// Returns `Error::Discovery` when nothing matches, including when `dir` does
/// not exist.
pub fn find_input(dir: &Path, extension: &str) -> Result<PathBuf> {
    let extension = extension.trim_start_matches('.');
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.display().to_string()),
        Pattern::escape(extension)
    );

    let mut matches: Vec<PathBuf> = glob(&pattern)
        .map_err(|e| Error::Config(format!("bad discovery pattern {}: {}", pattern, e)))?
        .filter_map(|p| p.ok())
        .filter(|p| p.is_file())
        .collect();
    matches.sort();
    debug!(pattern = %pattern, found = matches.len(), "discovery");

    match matches.into_iter().next() {
        Some(path) => {
            info!("found input {}", path.display());
            Ok(path)
        }
        None => Err(Error::Discovery {
            dir: dir.to_path_buf(),
            pattern: format!("*.{}", extension),
        }),
    }
}
