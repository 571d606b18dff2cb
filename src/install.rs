//! Install orchestration: materialize a runnable binary exactly once per
//! version.
//!
//! The existence of the final binary path is the single idempotency signal.
//! The fast path is a stat and nothing else; the slow path downloads,
//! extracts and fixes permissions under an install lock so two launchers
//! racing on the same fresh version do not interleave their work.

use crate::error::Result;
use crate::platform::PlatformKey;
use crate::{cache, download, extract};
use colored::Colorize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const RELEASE_HOST: &str = "https://github.com";
const REPO: &str = "stefanhoelzl/codehydra";

const LOCK_FILE: &str = ".install.lock";
const LOCK_POLL: Duration = Duration::from_millis(200);
/// A lock older than this belongs to a crashed launcher and may be taken over.
const LOCK_STALE: Duration = Duration::from_secs(30 * 60);

/// Resolves and, when needed, installs the release binary for one pinned
/// version.
pub struct Installer {
    platform: PlatformKey,
    version: String,
    base_url: String,
    cache_dir: PathBuf,
}

impl Installer {
    pub fn new(platform: PlatformKey, version: &str) -> Self {
        Self {
            platform,
            version: version.to_string(),
            base_url: RELEASE_HOST.to_string(),
            cache_dir: cache::release_dir(platform, version),
        }
    }

    /// Installer rooted at an explicit release host and cache directory.
    pub fn with_locations(
        platform: PlatformKey,
        version: &str,
        base_url: impl Into<String>,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            platform,
            version: version.to_string(),
            base_url: base_url.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Final location of the executable for this version.
    pub fn binary_path(&self) -> PathBuf {
        self.platform.binary_path(&self.cache_dir)
    }

    /// Release asset URL for this platform and version.
    pub fn download_url(&self) -> String {
        format!(
            "{}/{}/releases/download/v{}/{}",
            self.base_url,
            REPO,
            self.version,
            self.platform.asset_name()
        )
    }

    /// Make sure the binary for this version exists and return its path.
    ///
    /// Idempotent: once the binary is in place, repeat calls do no I/O beyond
    /// the existence check and print nothing.
    pub async fn ensure_installed(&self) -> Result<PathBuf> {
        let binary_path = self.binary_path();
        if binary_path.exists() {
            tracing::debug!(binary = %binary_path.display(), "release already cached");
            return Ok(binary_path);
        }

        fs::create_dir_all(&self.cache_dir)?;
        let _lock = InstallLock::acquire(&self.cache_dir).await?;
        if binary_path.exists() {
            // Another launcher finished the install while we waited.
            return Ok(binary_path);
        }

        println!(
            "{}",
            format!("Downloading CodeHydra {}...", self.version).bold()
        );
        let download_path = self.cache_dir.join(self.platform.asset_name());
        download::fetch(&self.download_url(), &download_path, &self.version).await?;

        if self.platform.is_archive() {
            println!("Extracting...");
        }
        extract::maybe_extract(&download_path, &self.cache_dir)?;

        if !self.platform.is_windows() {
            add_execute_bits(&binary_path)?;
        }

        println!("{}\n", "Done!".green());
        Ok(binary_path)
    }
}

/// Exclusive marker file guarding the check-then-install sequence against
/// concurrent launcher processes. Removed on drop.
struct InstallLock {
    path: PathBuf,
}

impl InstallLock {
    async fn acquire(cache_dir: &Path) -> Result<Self> {
        let path = cache_dir.join(LOCK_FILE);
        loop {
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
            {
                Ok(mut file) => {
                    let _ = write!(file, "{}", std::process::id());
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    if lock_is_stale(&path) {
                        tracing::warn!(lock = %path.display(), "removing stale install lock");
                        let _ = fs::remove_file(&path);
                        continue;
                    }
                    tokio::time::sleep(LOCK_POLL).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl Drop for InstallLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn lock_is_stale(path: &Path) -> bool {
    let Ok(metadata) = fs::metadata(path) else {
        return false;
    };
    let Ok(modified) = metadata.modified() else {
        return false;
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age > LOCK_STALE)
        .unwrap_or(false)
}

/// OR the three execute bits into the existing mode, preserving the rest.
#[cfg(unix)]
fn add_execute_bits(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let permission_err = |source| crate::error::LauncherError::Permission {
        path: path.to_path_buf(),
        source,
    };
    let mut perms = fs::metadata(path).map_err(permission_err)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms).map_err(permission_err)
}

#[cfg(not(unix))]
fn add_execute_bits(_path: &Path) -> Result<()> {
    Ok(())
}
