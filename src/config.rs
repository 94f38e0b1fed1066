//! Store location resolution shared by the CLI and embedders.

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Environment variable naming the notes directory.
pub const STORE_DIR_ENV: &str = "ZETTEL_DIR";

/// Environment variable holding the log filter, e.g. `debug` or `zettel=info`.
pub const LOG_ENV: &str = "ZETTEL_LOG";

/// Resolves the notes directory.
///
/// Precedence: an explicit path, then `ZETTEL_DIR`, then
/// `{data_dir}/zettel/notes` where `data_dir` is:
/// - Linux: `~/.local/share`
/// - macOS: `~/Library/Application Support`
/// - Windows: `C:\Users\<user>\AppData\Roaming`
///
/// # Errors
///
/// Returns an error if no explicit path or variable is given and the data
/// directory cannot be determined.
pub fn resolve_store_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }

    if let Some(dir) = std::env::var_os(STORE_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    default_store_dir()
}

/// Returns the platform default notes directory.
pub fn default_store_dir() -> Result<PathBuf> {
    let data_dir =
        dirs::data_dir().ok_or_else(|| anyhow::anyhow!("Failed to determine data directory"))?;

    Ok(data_dir.join("zettel").join("notes"))
}
