//! Editor settings installation.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{ProvisionError, Result};
use crate::net::Downloader;

/// Downloads the settings file and overwrites `dest` with it.
///
/// # Errors
/// Any download or write failure.
pub fn install_settings(downloader: &dyn Downloader, url: &str, dest: &Path) -> Result<()> {
    let body = downloader.get_bytes(url)?;

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| ProvisionError::io(parent, e))?;
    }
    fs::write(dest, &body).map_err(|e| ProvisionError::io(dest, e))?;

    info!("Wrote {} bytes of settings to {}", body.len(), dest.display());
    Ok(())
}
