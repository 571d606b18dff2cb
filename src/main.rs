use codehydra_launcher::{Installer, PlatformKey, launch};
use std::ffi::OsString;

/// The pinned release version this launcher was built for.
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        unsafe {
            std::env::set_var("RUST_LOG", "warn");
        }
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    // No flags of our own; everything after the program name goes to the app.
    let forwarded: Vec<OsString> = std::env::args_os().skip(1).collect();

    let platform = PlatformKey::current()?;
    let binary_path = Installer::new(platform, VERSION).ensure_installed().await?;

    launch::handoff(&binary_path, &forwarded)?;
    Ok(())
}
