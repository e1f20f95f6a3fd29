//! Font installation.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use super::scratch::ScratchDir;
use crate::error::{ProvisionError, Result};
use crate::font_registry::FontRegistry;
use crate::net::Downloader;

/// What the font step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontOutcome {
    /// Downloaded, copied and registered.
    Installed(PathBuf),
    /// Already at the destination; nothing was done.
    AlreadyPresent(PathBuf),
}

/// Font to install.
#[derive(Debug, Clone, Copy)]
pub struct FontSpec<'a> {
    /// Download URL.
    pub url: &'a str,
    /// File name at the destination.
    pub file_name: &'a str,
    /// Display name for registration.
    pub display_name: &'a str,
}

/// Installs the font into `font_dir` unless it is already there.
///
/// # Errors
/// Any download, copy or registration failure.
pub fn install_font(
    downloader: &dyn Downloader,
    registry: &dyn FontRegistry,
    scratch: &ScratchDir,
    font: FontSpec<'_>,
    font_dir: &std::path::Path,
) -> Result<FontOutcome> {
    let dest = font_dir.join(font.file_name);
    if dest.exists() {
        info!("Font already installed at {}, skipping", dest.display());
        return Ok(FontOutcome::AlreadyPresent(dest));
    }

    let staged = scratch.file(font.file_name);
    downloader.download_to(font.url, &staged)?;

    fs::create_dir_all(font_dir).map_err(|e| ProvisionError::io(font_dir, e))?;
    fs::copy(&staged, &dest).map_err(|e| ProvisionError::io(&dest, e))?;
    info!("Copied font to {}", dest.display());

    registry.register(font.display_name, &dest)?;
    Ok(FontOutcome::Installed(dest))
}
