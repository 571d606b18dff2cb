//! Per-version cache directory resolution.
//!
//! Every pinned version gets its own directory, so a version bump always
//! forces a fresh download and versions never collide. Nothing here touches
//! the filesystem; the installer creates the directory lazily.

use crate::platform::PlatformKey;
use std::path::PathBuf;

/// Resolve the cache directory for a release version
/// (e.g. `~/.local/share/codehydra/releases/1.2.3` on Linux).
pub fn release_dir(platform: PlatformKey, version: &str) -> PathBuf {
    let data_home = std::env::var_os("XDG_DATA_HOME").map(PathBuf::from);
    let local_app_data = std::env::var_os("LOCALAPPDATA").map(PathBuf::from);
    resolve_release_dir(platform, version, data_home, local_app_data, home_dir(platform))
}

fn home_dir(platform: PlatformKey) -> PathBuf {
    let var = if platform.is_windows() { "USERPROFILE" } else { "HOME" };
    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn resolve_release_dir(
    platform: PlatformKey,
    version: &str,
    data_home: Option<PathBuf>,
    local_app_data: Option<PathBuf>,
    home: PathBuf,
) -> PathBuf {
    match platform {
        PlatformKey::LinuxX64 => {
            let base = data_home.unwrap_or_else(|| home.join(".local/share"));
            base.join("codehydra").join("releases").join(version)
        }
        PlatformKey::MacX64 | PlatformKey::MacArm64 => home
            .join("Library/Application Support/Codehydra/releases")
            .join(version),
        PlatformKey::WindowsX64 => {
            let base = local_app_data.unwrap_or_else(|| home.join("AppData").join("Local"));
            base.join("Codehydra").join("releases").join(version)
        }
    }
}
