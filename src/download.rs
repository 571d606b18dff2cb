//! Streamed release download with atomic finalization.
//!
//! The body is streamed chunk by chunk into a `.tmp` sibling of the final
//! path and renamed into place only once fully written. Release assets run to
//! hundreds of megabytes, so the payload is never buffered whole in memory.
//! The rename is what makes the installer's existence check trustworthy: a
//! file observed at the destination is always a complete download.

use crate::error::{LauncherError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Suffix appended to the destination path while the body is still streaming.
const PARTIAL_SUFFIX: &str = ".tmp";

/// Path the body streams into before the atomic rename.
///
/// Lives in the same directory as `dest` so the rename never crosses a
/// filesystem boundary.
pub fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Download `url` to `dest`.
///
/// On failure the partial `.tmp` file is left behind for inspection; `dest`
/// itself is only ever created by the final rename, never partially written.
pub async fn fetch(url: &str, dest: &Path, launcher_version: &str) -> Result<()> {
    let tmp = partial_path(dest);

    let client = reqwest::Client::new();
    let mut response = client
        .get(url)
        .header(
            reqwest::header::USER_AGENT,
            format!("codehydra-launcher/{launcher_version}"),
        )
        .send()
        .await
        .map_err(|e| LauncherError::DownloadFailed(format!("request to {url} failed: {e}")))?;

    if !response.status().is_success() {
        return Err(LauncherError::DownloadFailed(format!(
            "{url} returned HTTP {}",
            response.status()
        )));
    }

    let pb = response.content_length().map(|total| {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb
    });

    let mut file = fs::File::create(&tmp)
        .await
        .map_err(|e| LauncherError::DownloadFailed(format!("cannot create {}: {e}", tmp.display())))?;
    let mut downloaded: u64 = 0;

    loop {
        let chunk = response
            .chunk()
            .await
            .map_err(|e| LauncherError::DownloadFailed(format!("transfer from {url} failed: {e}")))?;
        let Some(chunk) = chunk else { break };

        file.write_all(&chunk)
            .await
            .map_err(|e| LauncherError::DownloadFailed(format!("write to {} failed: {e}", tmp.display())))?;
        downloaded += chunk.len() as u64;
        if let Some(pb) = &pb {
            pb.set_position(downloaded);
        }
    }

    file.flush()
        .await
        .map_err(|e| LauncherError::DownloadFailed(format!("write to {} failed: {e}", tmp.display())))?;
    drop(file);

    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    // Only now does dest come into existence, fully written.
    fs::rename(&tmp, dest)
        .await
        .map_err(|e| LauncherError::DownloadFailed(format!("cannot finalize {}: {e}", dest.display())))?;

    tracing::debug!(url, dest = %dest.display(), bytes = downloaded, "download complete");
    Ok(())
}
