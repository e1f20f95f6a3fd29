//! Error type shared by every provisioning step.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal provisioning error.
///
/// Everything except a failed manifest download ends the run through one
/// of these variants.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Editor command-line tool not found on PATH.
    #[error("'{command}' was not found on PATH; install it or set editor_command")]
    ToolNotFound { command: String },

    /// Transport-level HTTP failure.
    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// Non-success HTTP status.
    #[error("Request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// GitHub API rate limit exhausted.
    #[error("GitHub API rate limit exceeded (set GITHUB_TOKEN to raise it)")]
    RateLimited,

    /// Latest-release lookup failed for a repository.
    #[error("Failed to fetch latest release of {repo}: {cause}")]
    ReleaseLookup { repo: String, cause: String },

    /// Latest release carries no installable package.
    #[error("Latest release of {repo} has no asset ending in '{suffix}'")]
    AssetNotFound { repo: String, suffix: String },

    /// Response body could not be understood.
    #[error("Invalid response from {url}: {message}")]
    InvalidResponse { url: String, message: String },

    /// Extension install command exited unsuccessfully.
    #[error("Installing extension '{target}' failed ({status})")]
    InstallFailed { target: String, status: String },

    /// Child process could not be started.
    #[error("Failed to run '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Font registration with the platform failed.
    #[error("Failed to register font '{name}': {message}")]
    FontRegistration { name: String, message: String },

    /// Filesystem error on a specific path.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A per-user directory could not be determined.
    #[error("Could not determine the {0} directory")]
    MissingDirectory(&'static str),

    /// Configuration value rejected by validation.
    #[error("Invalid configuration for '{key}': {message}")]
    InvalidConfig { key: String, message: String },
}

impl ProvisionError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for provisioning operations.
pub type Result<T> = std::result::Result<T, ProvisionError>;
