use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const LIBRARY_ENV: &str = "QUOTEGIF_LIBRARY";
pub const RENDER_DIR_ENV: &str = "QUOTEGIF_RENDER_DIR";

/// Resolve the media library root from, in order of priority:
/// 1. An explicit path (from the command line)
/// 2. The QUOTEGIF_LIBRARY environment variable
pub fn resolve_library(explicit: Option<&Path>) -> Result<PathBuf> {
    let root = if let Some(path) = explicit {
        path.to_path_buf()
    } else if let Ok(val) = std::env::var(LIBRARY_ENV) {
        PathBuf::from(val)
    } else {
        return Err(Error::Config(format!(
            "no media library given; pass a path or set {LIBRARY_ENV}"
        )));
    };

    if !root.is_dir() {
        return Err(Error::Config(format!(
            "media library is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

/// Resolve where rendered clips are written, creating it if needed:
/// 1. An explicit path (from --render-dir)
/// 2. The QUOTEGIF_RENDER_DIR environment variable
/// 3. The XDG cache directory (~/.cache/quotegif/renders/)
pub fn resolve_render_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let dir = if let Some(path) = explicit {
        path.to_path_buf()
    } else if let Ok(val) = std::env::var(RENDER_DIR_ENV) {
        PathBuf::from(val)
    } else {
        xdg::BaseDirectories::with_prefix("quotegif")
            .get_cache_home()
            .ok_or_else(|| {
                Error::Config(
                    "could not determine XDG cache home directory".into(),
                )
            })?
            .join("renders")
    };

    std::fs::create_dir_all(&dir).map_err(|e| {
        Error::Config(format!(
            "cannot create render directory {}: {e}",
            dir.display()
        ))
    })?;
    Ok(dir)
}
