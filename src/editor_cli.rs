//! Editor command-line tool integration.
//!
//! Locates the editor CLI on PATH and drives its extension installer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use tracing::{debug, info};

use crate::error::{ProvisionError, Result};

/// What to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionTarget {
    /// Marketplace identifier, e.g. `rust-lang.rust-analyzer`.
    Marketplace(String),
    /// Local package file.
    Package(PathBuf),
}

impl fmt::Display for ExtensionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Marketplace(id) => write!(f, "{}", id),
            Self::Package(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Something that can install editor extensions.
pub trait ExtensionHost {
    /// Resolves the tool before any other work happens.
    fn preflight(&self) -> Result<PathBuf>;

    /// Installs one extension, overwriting an existing install.
    fn install_extension(&self, target: &ExtensionTarget) -> Result<()>;
}

/// The editor CLI found on PATH.
pub struct EditorCli {
    /// Command name as configured.
    command: String,
    /// Resolved executable, set by `preflight`.
    resolved: OnceLock<PathBuf>,
}

impl EditorCli {
    /// Creates a handle for `command`; nothing is resolved yet.
    #[must_use]
    pub fn new(command: &str) -> Self {
        assert!(!command.is_empty(), "Editor command must not be empty");
        Self {
            command: command.to_string(),
            resolved: OnceLock::new(),
        }
    }

    /// Returns the configured command name.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Looks up an executable on PATH.
    ///
    /// Uses `where` on Windows and `which` elsewhere.
    #[must_use]
    pub fn locate(command: &str) -> Option<PathBuf> {
        debug!("Looking for executable: {}", command);

        #[cfg(windows)]
        let check = Command::new("where").arg(command).output();

        #[cfg(not(windows))]
        let check = Command::new("which").arg(command).output();

        match check {
            Ok(output) if output.status.success() => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                pick_executable(&stdout)
            }
            Ok(_) => {
                debug!("'{}' not found in PATH", command);
                None
            }
            Err(e) => {
                debug!("Error checking for '{}': {}", command, e);
                None
            }
        }
    }

    fn program(&self) -> &Path {
        self.resolved
            .get()
            .map_or_else(|| Path::new(&self.command), PathBuf::as_path)
    }
}

impl ExtensionHost for EditorCli {
    fn preflight(&self) -> Result<PathBuf> {
        let path = Self::locate(&self.command).ok_or_else(|| ProvisionError::ToolNotFound {
            command: self.command.clone(),
        })?;
        info!("Found '{}' at: {}", self.command, path.display());
        let _ = self.resolved.set(path.clone());
        Ok(path)
    }

    fn install_extension(&self, target: &ExtensionTarget) -> Result<()> {
        let program = self.program();
        info!("Installing extension: {}", target);

        let mut command = Command::new(program);
        command.arg("--install-extension");
        match target {
            ExtensionTarget::Marketplace(id) => command.arg(id),
            ExtensionTarget::Package(path) => command.arg(path),
        };
        command.arg("--force");

        let status = command.status().map_err(|e| ProvisionError::Spawn {
            command: program.display().to_string(),
            source: e,
        })?;

        if !status.success() {
            let code = status
                .code()
                .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {}", c));
            debug!("Install of {} failed: {}", target, code);
            return Err(ProvisionError::InstallFailed {
                target: target.to_string(),
                status: code,
            });
        }

        debug!("Installed {}", target);
        Ok(())
    }
}

/// Picks the executable from `where`/`which` output.
///
/// `where` lists every match. On Windows an `.exe`/`.cmd`/`.bat` entry wins
/// over the extensionless shell shim installed next to it.
fn pick_executable(output: &str) -> Option<PathBuf> {
    let candidates: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let launchable = candidates.iter().find(|line| {
        Path::new(line)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "exe" | "cmd" | "bat"))
    });

    if cfg!(windows) {
        launchable.or(candidates.first()).map(PathBuf::from)
    } else {
        candidates.first().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        let id = ExtensionTarget::Marketplace("rust-lang.rust-analyzer".to_string());
        assert_eq!(id.to_string(), "rust-lang.rust-analyzer");

        let pkg = ExtensionTarget::Package(PathBuf::from("/tmp/theme.vsix"));
        assert_eq!(pkg.to_string(), "/tmp/theme.vsix");
    }

    #[test]
    fn test_pick_executable_first_line() {
        let picked = pick_executable("/usr/bin/code\n/usr/local/bin/code\n").unwrap();
        assert_eq!(picked, PathBuf::from("/usr/bin/code"));
    }

    #[test]
    fn test_pick_executable_empty() {
        assert!(pick_executable("\n  \n").is_none());
    }

    #[cfg(windows)]
    #[test]
    fn test_pick_executable_prefers_cmd_on_windows() {
        let output = "C:\\Code\\bin\\code\r\nC:\\Code\\bin\\code.cmd\r\n";
        assert_eq!(
            pick_executable(output).unwrap(),
            PathBuf::from("C:\\Code\\bin\\code.cmd")
        );
    }

    #[test]
    fn test_missing_tool_fails_preflight() {
        let cli = EditorCli::new("devsetup-no-such-editor-cli");
        let err = cli.preflight().unwrap_err();
        assert!(matches!(err, ProvisionError::ToolNotFound { .. }));
        assert_eq!(cli.command(), "devsetup-no-such-editor-cli");
    }
}
