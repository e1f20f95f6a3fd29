//! Configuration module for devsetup.
//!
//! Handles loading and parsing the .devsetuprc configuration file. Every key
//! has a built-in default, so a missing file is not an error.

pub mod platform;

use std::env;
use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use platform::{TargetPaths, default_font_dir, default_settings_path};

use crate::error::{ProvisionError, Result};
use crate::logging::LogConfig;

/// Environment variable naming an alternative config file.
pub const CONFIG_ENV_VAR: &str = "DEVSETUP_CONFIG";

/// Default editor command-line tool.
pub const DEFAULT_EDITOR_COMMAND: &str = "code";

/// Default packaging suffix for release assets.
pub const DEFAULT_ASSET_SUFFIX: &str = ".vsix";

/// Default GitHub REST API base URL.
pub const DEFAULT_GITHUB_API: &str = "https://api.github.com";

const DEFAULT_FONT_FILE: &str = "CaskaydiaCoveNerdFont-Regular.ttf";
const DEFAULT_FONT_NAME: &str = "CaskaydiaCove Nerd Font";

/// Keys with no built-in value; every run needs them from the config file.
pub const SOURCE_KEYS: [&str; 3] = ["settings_url", "font_url", "extensions_url"];

/// Default .devsetuprc file content with all keys documented.
const DEFAULT_RC: &str = r#"# devsetup Configuration File
# ============================
# Lines starting with '#' are comments. Format: key = value
#
# Editor
# ------
# Command-line tool used to install extensions (must be on PATH)
# editor_command = code

# Sources
# -------
# settings_url, font_url and extensions_url have no defaults and must be set
# before the first run, e.g.
#   settings_url = https://raw.githubusercontent.com/<you>/<profile>/main/settings.json
settings_url =
font_url =
extensions_url =

# Settings
# --------
# Override the destination (defaults to the editor's per-user settings.json)
# settings_path =

# Font
# ----
# font_file = CaskaydiaCoveNerdFont-Regular.ttf
# font_name = CaskaydiaCove Nerd Font
# Override the per-user font directory
# font_dir =

# Extensions
# ----------
# extensions_url points at a plain-text list of extension identifiers, one per line.
# Repositories whose latest release carries an extension package (owner/repo, comma-separated)
# release_repos = owner/editor-theme, owner/editor-snippets
# asset_suffix = .vsix
# github_api = https://api.github.com

# Logging
# -------
# log_level = info
# log_retention_hours = 24
# log_enabled = true
"#;

/// Provisioning configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Editor command-line tool name.
    pub editor_command: String,
    /// URL of the settings JSON file.
    pub settings_url: String,
    /// URL of the font file.
    pub font_url: String,
    /// File name the font is installed under.
    pub font_file: String,
    /// Human-readable font name used for registration.
    pub font_name: String,
    /// URL of the extension manifest.
    pub extensions_url: String,
    /// Repositories to install release packages from, in order.
    pub release_repos: Vec<String>,
    /// File name suffix identifying a packaging asset.
    pub asset_suffix: String,
    /// GitHub REST API base URL.
    pub github_api: String,
    /// Explicit settings file destination.
    pub settings_path: Option<PathBuf>,
    /// Explicit font directory.
    pub font_dir: Option<PathBuf>,
    /// Logging configuration.
    pub log_config: LogConfig,
    /// Path this config was loaded from.
    pub config_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            editor_command: DEFAULT_EDITOR_COMMAND.to_string(),
            settings_url: String::new(),
            font_url: String::new(),
            font_file: DEFAULT_FONT_FILE.to_string(),
            font_name: DEFAULT_FONT_NAME.to_string(),
            extensions_url: String::new(),
            release_repos: Vec::new(),
            asset_suffix: DEFAULT_ASSET_SUFFIX.to_string(),
            github_api: DEFAULT_GITHUB_API.to_string(),
            settings_path: None,
            font_dir: None,
            log_config: LogConfig::default(),
            config_path: Self::default_config_path(),
        }
    }
}

impl Config {
    /// Returns the default config file path.
    ///
    /// `DEVSETUP_CONFIG` wins over ~/.devsetuprc.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".devsetuprc")
    }

    /// Loads configuration from the default path.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn load() -> io::Result<Self> {
        let path = Self::default_config_path();
        Self::load_from(&path)
    }

    /// Loads configuration from a specific path, falling back to defaults
    /// when the file does not exist.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read.
    pub fn load_from(path: &Path) -> io::Result<Self> {
        let mut config = Self {
            config_path: path.to_path_buf(),
            ..Self::default()
        };

        if path.exists() {
            let content = fs::read_to_string(path)?;
            config.parse(&content);
        }

        Ok(config)
    }

    /// Parses config content over the current values.
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        let mut config = Self::default();
        config.parse(content);
        config
    }

    /// Writes the documented default config file if none exists.
    ///
    /// Returns false when a file is already present.
    ///
    /// # Errors
    /// Returns error if the file cannot be written.
    pub fn write_default(path: &Path) -> io::Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = fs::File::create(path)?;
        file.write_all(DEFAULT_RC.as_bytes())?;
        Ok(true)
    }

    /// Parses the config file content.
    fn parse(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim();

                // Remove inline comments
                let value = value.split(" #").next().unwrap_or(value).trim();

                self.apply_setting(key, value);
            }
        }
    }

    /// Applies a single setting.
    fn apply_setting(&mut self, key: &str, value: &str) {
        match key {
            "editor_command" | "editor" => self.editor_command = value.to_string(),
            "settings_url" => self.settings_url = value.to_string(),
            "font_url" => self.font_url = value.to_string(),
            "font_file" => self.font_file = value.to_string(),
            "font_name" => self.font_name = value.to_string(),
            "extensions_url" | "manifest_url" => self.extensions_url = value.to_string(),
            "release_repos" => {
                self.release_repos = value
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            "asset_suffix" => self.asset_suffix = value.to_string(),
            "github_api" => self.github_api = value.trim_end_matches('/').to_string(),
            "settings_path" => self.settings_path = non_empty_path(value),
            "font_dir" => self.font_dir = non_empty_path(value),
            "log_level" => self.log_config.level = LogConfig::parse_level(value),
            "log_retention" | "log_retention_hours" => {
                self.log_config.retention_hours = LogConfig::parse_retention(value);
            }
            "log_enabled" | "logging" => {
                self.log_config.enabled =
                    matches!(value.to_lowercase().as_str(), "true" | "yes" | "1" | "on");
            }
            _ => {
                tracing::debug!("Ignoring unknown config key '{}'", key);
            }
        }
    }

    /// Checks that every value the pipeline depends on is usable.
    ///
    /// # Errors
    /// Returns `InvalidConfig` naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("editor_command", &self.editor_command),
            ("settings_url", &self.settings_url),
            ("font_url", &self.font_url),
            ("font_file", &self.font_file),
            ("font_name", &self.font_name),
            ("extensions_url", &self.extensions_url),
            ("asset_suffix", &self.asset_suffix),
            ("github_api", &self.github_api),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                if SOURCE_KEYS.contains(&key) {
                    return Err(invalid(
                        key,
                        &format!(
                            "not set in {} (run devsetup --init-config for a template)",
                            self.config_path.display()
                        ),
                    ));
                }
                return Err(invalid(key, "value must not be empty"));
            }
        }

        if Path::new(&self.font_file).file_name() != Some(OsStr::new(&self.font_file)) {
            return Err(invalid("font_file", "must be a plain file name"));
        }

        for repo in &self.release_repos {
            if !is_valid_repository(repo) {
                return Err(invalid(
                    "release_repos",
                    &format!("'{}' is not in owner/repo format", repo),
                ));
            }
        }

        Ok(())
    }
}

/// Returns true for `owner/repo` identifiers.
#[must_use]
pub fn is_valid_repository(repo: &str) -> bool {
    match repo.split_once('/') {
        Some((owner, name)) => {
            !owner.is_empty() && !name.is_empty() && !name.contains('/') && !repo.contains(' ')
        }
        None => false,
    }
}

fn non_empty_path(value: &str) -> Option<PathBuf> {
    if value.is_empty() {
        None
    } else {
        Some(PathBuf::from(value))
    }
}

fn invalid(key: &str, message: &str) -> ProvisionError {
    ProvisionError::InvalidConfig {
        key: key.to_string(),
        message: message.to_string(),
    }
}
