//! Platform detection for selecting the correct release asset.
//!
//! CodeHydra publishes one release asset per supported platform. This module
//! maps the running OS and CPU architecture to that asset and to the location
//! of the executable inside the unpacked asset:
//!
//! - **Linux x86_64**: a self-contained AppImage; the downloaded file *is* the
//!   executable.
//! - **macOS x86_64 / arm64**: a zip containing a `CodeHydra.app` bundle inside
//!   a folder named after the asset.
//! - **Windows x86_64**: a portable zip unpacking to a single folder with
//!   `CodeHydra.exe` inside.
//!
//! Any other (OS, architecture) pair is rejected up front with
//! [`LauncherError::UnsupportedPlatform`] before any filesystem or network
//! work happens.

use crate::error::{LauncherError, Result};
use std::path::{Path, PathBuf};

/// A supported (OS, CPU architecture) combination.
///
/// The set is closed on purpose: adding a platform means adding a variant and
/// letting the compiler point at every match that needs updating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformKey {
    LinuxX64,
    MacX64,
    MacArm64,
    WindowsX64,
}

impl PlatformKey {
    /// Detect the platform this process is running on.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::UnsupportedPlatform`] naming the unmatched
    /// (OS, architecture) pair when CodeHydra has no release asset for it.
    pub fn current() -> Result<Self> {
        Self::from_os_arch(std::env::consts::OS, std::env::consts::ARCH)
    }

    fn from_os_arch(os: &str, arch: &str) -> Result<Self> {
        match (os, arch) {
            ("linux", "x86_64") => Ok(Self::LinuxX64),
            ("macos", "x86_64") => Ok(Self::MacX64),
            ("macos", "aarch64") => Ok(Self::MacArm64),
            ("windows", "x86_64") => Ok(Self::WindowsX64),
            _ => Err(LauncherError::UnsupportedPlatform {
                os: os.to_string(),
                arch: arch.to_string(),
            }),
        }
    }

    /// The GitHub release asset published for this platform.
    pub fn asset_name(self) -> &'static str {
        match self {
            Self::LinuxX64 => "CodeHydra-linux-x64.AppImage",
            Self::MacX64 => "CodeHydra-darwin-x64.zip",
            Self::MacArm64 => "CodeHydra-darwin-arm64.zip",
            Self::WindowsX64 => "CodeHydra-win-portable-x64.zip",
        }
    }

    /// Whether the asset is a zip that needs unpacking after download.
    pub fn is_archive(self) -> bool {
        self.asset_name().ends_with(".zip")
    }

    pub fn is_windows(self) -> bool {
        matches!(self, Self::WindowsX64)
    }

    /// Location of the executable inside `cache_dir` once the asset has been
    /// downloaded (and, for zips, extracted).
    pub fn binary_path(self, cache_dir: &Path) -> PathBuf {
        match self {
            Self::LinuxX64 => cache_dir.join(self.asset_name()),
            Self::MacX64 | Self::MacArm64 => {
                // The zip unpacks to a folder named after the asset itself.
                let app_dir = self.asset_name().trim_end_matches(".zip");
                cache_dir
                    .join(app_dir)
                    .join("CodeHydra.app")
                    .join("Contents")
                    .join("MacOS")
                    .join("CodeHydra")
            }
            Self::WindowsX64 => cache_dir
                .join("CodeHydra-win-portable-x64")
                .join("CodeHydra.exe"),
        }
    }

    /// All supported platforms, for exhaustive tests.
    pub fn all() -> [Self; 4] {
        [
            Self::LinuxX64,
            Self::MacX64,
            Self::MacArm64,
            Self::WindowsX64,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_every_platform_has_an_asset() {
        for platform in PlatformKey::all() {
            assert!(!platform.asset_name().is_empty());
        }
    }

    #[test]
    fn test_binary_path_stays_inside_cache_dir() {
        let cache_dir = Path::new("/data/codehydra/releases/1.0.0");
        for platform in PlatformKey::all() {
            let binary = platform.binary_path(cache_dir);
            assert!(
                binary.starts_with(cache_dir),
                "{} escapes the cache dir",
                binary.display()
            );
        }
    }

    #[test]
    fn test_linux_asset_is_the_binary() {
        let cache_dir = Path::new("/cache");
        assert_eq!(
            PlatformKey::LinuxX64.binary_path(cache_dir),
            Path::new("/cache/CodeHydra-linux-x64.AppImage")
        );
        assert!(!PlatformKey::LinuxX64.is_archive());
    }

    #[test]
    fn test_mac_binary_path_descends_into_bundle() {
        let cache_dir = Path::new("/cache");
        let binary = PlatformKey::MacArm64.binary_path(cache_dir);
        assert_eq!(
            binary,
            Path::new("/cache/CodeHydra-darwin-arm64/CodeHydra.app/Contents/MacOS/CodeHydra")
        );
    }

    #[test]
    fn test_windows_binary_path_is_nested_exe() {
        let cache_dir = Path::new("/cache");
        let binary = PlatformKey::WindowsX64.binary_path(cache_dir);
        assert_eq!(
            binary,
            Path::new("/cache/CodeHydra-win-portable-x64/CodeHydra.exe")
        );
    }

    #[test]
    fn test_unsupported_platform_names_the_key() {
        let err = PlatformKey::from_os_arch("freebsd", "riscv64").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("freebsd"));
        assert!(message.contains("riscv64"));
    }

    #[test]
    fn test_known_pairs_resolve() {
        assert_eq!(
            PlatformKey::from_os_arch("linux", "x86_64").unwrap(),
            PlatformKey::LinuxX64
        );
        assert_eq!(
            PlatformKey::from_os_arch("macos", "aarch64").unwrap(),
            PlatformKey::MacArm64
        );
        assert_eq!(
            PlatformKey::from_os_arch("windows", "x86_64").unwrap(),
            PlatformKey::WindowsX64
        );
    }
}
