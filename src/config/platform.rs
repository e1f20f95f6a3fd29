//! Per-user install locations for the current platform.

use std::path::PathBuf;

use super::Config;
use crate::error::{ProvisionError, Result};

/// Editor product directory under the platform config root.
const EDITOR_PRODUCT_DIR: &str = "Code";

/// Resolved filesystem targets for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPaths {
    /// Destination of the editor settings file.
    pub settings_file: PathBuf,
    /// Per-user font directory.
    pub font_dir: PathBuf,
    /// Parent directory for the scratch workspace.
    pub scratch_root: PathBuf,
}

impl TargetPaths {
    /// Resolves targets from config overrides, then platform defaults.
    ///
    /// # Errors
    /// Returns `MissingDirectory` if a per-user directory cannot be found.
    pub fn resolve(config: &Config) -> Result<Self> {
        let settings_file = match &config.settings_path {
            Some(path) => path.clone(),
            None => default_settings_path()?,
        };
        let font_dir = match &config.font_dir {
            Some(path) => path.clone(),
            None => default_font_dir()?,
        };

        Ok(Self {
            settings_file,
            font_dir,
            scratch_root: std::env::temp_dir(),
        })
    }
}

/// Returns the editor's per-user settings.json path.
///
/// - Windows: %APPDATA%\Code\User\settings.json
/// - macOS: ~/Library/Application Support/Code/User/settings.json
/// - Linux: ~/.config/Code/User/settings.json
///
/// # Errors
/// Returns `MissingDirectory` if the config root is unknown.
pub fn default_settings_path() -> Result<PathBuf> {
    let root = dirs::config_dir().ok_or(ProvisionError::MissingDirectory("user config"))?;
    Ok(root
        .join(EDITOR_PRODUCT_DIR)
        .join("User")
        .join("settings.json"))
}

/// Returns the per-user font directory.
///
/// # Errors
/// Returns `MissingDirectory` if no per-user font location exists.
#[cfg(windows)]
pub fn default_font_dir() -> Result<PathBuf> {
    let local = dirs::data_local_dir().ok_or(ProvisionError::MissingDirectory("local app data"))?;
    Ok(local.join("Microsoft").join("Windows").join("Fonts"))
}

/// Returns the per-user font directory.
///
/// # Errors
/// Returns `MissingDirectory` if no per-user font location exists.
#[cfg(not(windows))]
pub fn default_font_dir() -> Result<PathBuf> {
    dirs::font_dir().ok_or(ProvisionError::MissingDirectory("user font"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_win() {
        let config = Config {
            settings_path: Some(PathBuf::from("/custom/settings.json")),
            font_dir: Some(PathBuf::from("/custom/fonts")),
            ..Config::default()
        };
        let paths = TargetPaths::resolve(&config).unwrap();
        assert_eq!(paths.settings_file, PathBuf::from("/custom/settings.json"));
        assert_eq!(paths.font_dir, PathBuf::from("/custom/fonts"));
        assert_eq!(paths.scratch_root, std::env::temp_dir());
    }

    #[test]
    fn test_default_settings_path_shape() {
        if let Ok(path) = default_settings_path() {
            assert!(path.ends_with("Code/User/settings.json"));
        }
    }
}
