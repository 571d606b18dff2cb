//! Library interface for the CodeHydra launcher
//!
//! Exposes the resolution and install pipeline for integration testing; the
//! binary in `main.rs` is a thin wrapper over these modules.

pub mod cache;
pub mod download;
pub mod error;
pub mod extract;
pub mod install;
pub mod launch;
pub mod platform;

pub use error::{LauncherError, Result};
pub use install::Installer;
pub use platform::PlatformKey;
