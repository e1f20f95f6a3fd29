//! Per-user font registration.
//!
//! Windows keeps per-user fonts in the registry; fontconfig platforms need
//! their cache refreshed; macOS picks up ~/Library/Fonts on its own.

use std::path::Path;
#[cfg(not(any(windows, target_os = "macos")))]
use std::process::Command;

use tracing::{debug, info};

#[cfg_attr(target_os = "macos", allow(unused_imports))]
use crate::error::{ProvisionError, Result};

/// Registry key holding per-user font entries.
pub const USER_FONTS_KEY: &str = r"HKCU\Software\Microsoft\Windows NT\CurrentVersion\Fonts";

/// Makes an installed font file visible to applications.
pub trait FontRegistry {
    /// Registers `font_path` under the display name `name`.
    fn register(&self, name: &str, font_path: &Path) -> Result<()>;
}

/// The current platform's font database.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFontRegistry;

impl SystemFontRegistry {
    /// Creates the registry handle.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Returns the registry value name Windows uses for a font file.
///
/// `.otf` files are tagged OpenType, everything else TrueType.
#[must_use]
pub fn registry_value_name(name: &str, font_path: &Path) -> String {
    let is_otf = font_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("otf"));

    if is_otf {
        format!("{} (OpenType)", name)
    } else {
        format!("{} (TrueType)", name)
    }
}

impl FontRegistry for SystemFontRegistry {
    #[cfg(windows)]
    fn register(&self, name: &str, font_path: &Path) -> Result<()> {
        use std::process::Command;

        let value_name = registry_value_name(name, font_path);
        let data = font_path.display().to_string();
        debug!("reg add {} /v {} /d {}", USER_FONTS_KEY, value_name, data);

        let output = Command::new("reg")
            .args([
                "add",
                USER_FONTS_KEY,
                "/v",
                &value_name,
                "/t",
                "REG_SZ",
                "/d",
                &data,
                "/f",
            ])
            .output()
            .map_err(|e| ProvisionError::Spawn {
                command: "reg".to_string(),
                source: e,
            })?;

        if !output.status.success() {
            return Err(ProvisionError::FontRegistration {
                name: name.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Registered font '{}' -> {}", value_name, data);
        Ok(())
    }

    #[cfg(target_os = "macos")]
    fn register(&self, name: &str, font_path: &Path) -> Result<()> {
        debug!(
            "No registration needed for '{}' at {}",
            name,
            font_path.display()
        );
        info!("Font '{}' installed to ~/Library/Fonts", name);
        Ok(())
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    fn register(&self, name: &str, font_path: &Path) -> Result<()> {
        let font_dir = font_path.parent().unwrap_or(font_path);
        debug!("fc-cache -f {}", font_dir.display());

        let output = match Command::new("fc-cache").arg("-f").arg(font_dir).output() {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    "fc-cache not found; '{}' will be available after the font cache refreshes",
                    name
                );
                return Ok(());
            }
            Err(e) => {
                return Err(ProvisionError::Spawn {
                    command: "fc-cache".to_string(),
                    source: e,
                });
            }
        };

        if !output.status.success() {
            return Err(ProvisionError::FontRegistration {
                name: name.to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        info!("Registered font '{}' from {}", name, font_dir.display());
        Ok(())
    }
}
