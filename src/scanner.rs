//! Directory scan for the photo session.

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif", "bmp", "tiff", "tif"];

pub fn is_photo_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| PHOTO_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Recursively collects photo files under `dir`, sorted by path for a
/// stable session order.
pub fn scan_photos(dir: &Path) -> Result<Vec<PathBuf>> {
    ensure!(dir.is_dir(), "not a directory: {:?}", dir);

    let mut photos = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(%err, "skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_photo_path(entry.path()) {
            photos.push(entry.path().to_path_buf());
        }
    }
    photos.sort();

    debug!(dir = ?dir, count = photos.len(), "scan complete");
    Ok(photos)
}

/// Resolves the directory to scan from an optional CLI argument.
pub fn resolve_scan_dir(arg: Option<&Path>) -> Result<PathBuf> {
    match arg {
        Some(path) if path.is_dir() => Ok(path.to_path_buf()),
        Some(path) => Ok(path
            .parent()
            .with_context(|| format!("no parent directory for {:?}", path))?
            .to_path_buf()),
        None => std::env::current_dir().context("cannot resolve current directory"),
    }
}
