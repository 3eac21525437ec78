//! Cache directory resolution

use crate::error::{HnError, HnResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Subdirectory of the cache root owned by this application
pub const APP_DIR: &str = "hnposts";

/// Environment variable naming the base cache directory
pub const CACHE_HOME_ENV: &str = "XDG_CACHE_HOME";

/// Resolve the cache directory from the environment
///
/// Uses `$XDG_CACHE_HOME/hnposts` when the variable is set to an absolute
/// path, otherwise `~/.cache/hnposts`.
pub fn default_cache_dir() -> HnResult<PathBuf> {
    resolve_cache_dir(std::env::var_os(CACHE_HOME_ENV).map(PathBuf::from), dirs::home_dir())
}

fn resolve_cache_dir(xdg: Option<PathBuf>, home: Option<PathBuf>) -> HnResult<PathBuf> {
    let root = match xdg {
        Some(path) if path.is_absolute() => path,
        _ => home
            .map(|home| home.join(".cache"))
            .ok_or(HnError::CacheDirUnavailable)?,
    };
    Ok(root.join(APP_DIR))
}

/// Create the cache directory with owner-only permissions if it is missing
pub fn ensure_cache_dir(dir: &Path) -> HnResult<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o700);
    }

    builder
        .create(dir)
        .map_err(|e| HnError::io(format!("creating cache directory {}", dir.display()), e))?;
    debug!("Created cache directory {}", dir.display());
    Ok(())
}
