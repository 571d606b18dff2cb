//! Conditional archive extraction.
//!
//! macOS and Windows assets are zips; the Linux AppImage is used as-is. After
//! a successful extraction the archive is deleted so only the unpacked tree
//! remains in the cache directory.

use crate::error::{LauncherError, Result};
use std::fs;
use std::path::Path;
use zip::ZipArchive;

fn is_zip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("zip")
}

/// Unpack `downloaded` into `dest_dir` if it is a zip, then remove it.
/// Non-archives are left untouched; they are the final artifact themselves.
///
/// Partial extraction is not rolled back on failure; the next launch of a
/// broken install starts over because the binary path never materialized.
pub fn maybe_extract(downloaded: &Path, dest_dir: &Path) -> Result<()> {
    if !is_zip(downloaded) {
        return Ok(());
    }

    let file = fs::File::open(downloaded).map_err(|e| {
        LauncherError::ExtractionFailed(format!("cannot open {}: {e}", downloaded.display()))
    })?;
    let mut archive = ZipArchive::new(file).map_err(|e| {
        LauncherError::ExtractionFailed(format!("{} is not a valid zip: {e}", downloaded.display()))
    })?;
    archive.extract(dest_dir).map_err(|e| {
        LauncherError::ExtractionFailed(format!("unpacking into {} failed: {e}", dest_dir.display()))
    })?;

    fs::remove_file(downloaded)?;
    tracing::debug!(archive = %downloaded.display(), dest = %dest_dir.display(), "archive extracted");
    Ok(())
}
