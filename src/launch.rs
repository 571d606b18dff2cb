//! Process handoff to the installed binary.
//!
//! On unix the launcher replaces its own process image, so the application
//! inherits the PID, stdio and environment and the launcher is gone. Windows
//! has no equivalent, so the binary runs as a child and the launcher exits
//! with the child's exact exit code. Either way stdio passes through
//! untouched and the observable exit code is the application's.

use crate::error::{LauncherError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

/// Hand control to `binary_path`, forwarding `args` verbatim.
///
/// Does not return on success. An `Ok` never actually materializes; the
/// signature exists so `main` can propagate the failure case with `?`.
pub fn handoff(binary_path: &Path, args: &[OsString]) -> Result<()> {
    tracing::debug!(binary = %binary_path.display(), ?args, "handing off");
    exec_or_wait(binary_path, args)
}

#[cfg(unix)]
fn exec_or_wait(binary_path: &Path, args: &[OsString]) -> Result<()> {
    use std::os::unix::process::CommandExt;

    // exec only returns on failure.
    let err = Command::new(binary_path).args(args).exec();
    Err(LauncherError::LaunchFailed {
        path: binary_path.to_path_buf(),
        source: err,
    })
}

#[cfg(not(unix))]
fn exec_or_wait(binary_path: &Path, args: &[OsString]) -> Result<()> {
    let status = Command::new(binary_path)
        .args(args)
        .status()
        .map_err(|source| LauncherError::LaunchFailed {
            path: binary_path.to_path_buf(),
            source,
        })?;
    std::process::exit(status.code().unwrap_or(1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_missing_binary_reports_launch_failure() {
        let err = handoff(Path::new("/nonexistent/codehydra"), &[]).unwrap_err();
        assert!(matches!(err, LauncherError::LaunchFailed { .. }));
        assert!(err.to_string().contains("/nonexistent/codehydra"));
    }
}
