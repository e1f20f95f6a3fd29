//! devsetup
//!
//! Provisions a local editor environment in one sequential run: settings
//! file, font, manifest extensions and release-packaged extensions.
//!
//! # Architecture
//!
//! - **Config Module**: `.devsetuprc` parsing and per-user install paths
//! - **Net / GitHub Modules**: blocking HTTP downloads and latest-release lookup
//! - **Editor CLI Module**: PATH preflight and `--install-extension` calls
//! - **Font Registry Module**: per-user font registration
//! - **Provision Module**: the pipeline and its scratch workspace
//!
//! # Usage
//!
//! ```no_run
//! use devsetup::{Backends, Config, EditorCli, GitHubClient, HttpClient, Provisioner};
//! use devsetup::{SystemFontRegistry, TargetPaths};
//!
//! let config = Config::load().expect("Failed to load config");
//! config.validate().expect("Incomplete config");
//! let paths = TargetPaths::resolve(&config).expect("No per-user directories");
//! let http = HttpClient::new().expect("Failed to build HTTP client");
//! let github = GitHubClient::new(&http, &config.github_api);
//! let editor = EditorCli::new(&config.editor_command);
//! let fonts = SystemFontRegistry::new();
//!
//! let backends = Backends {
//!     downloader: &http,
//!     releases: &github,
//!     host: &editor,
//!     fonts: &fonts,
//! };
//! let summary = Provisioner::new(&config, paths, backends).run();
//! ```

// Clippy configuration - allow common patterns
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

pub mod config;
pub mod editor_cli;
pub mod error;
pub mod font_registry;
pub mod github;
pub mod logging;
pub mod net;
pub mod provision;

// Re-export main types
pub use config::{Config, TargetPaths};
pub use editor_cli::{EditorCli, ExtensionHost, ExtensionTarget};
pub use error::{ProvisionError, Result};
pub use font_registry::{FontRegistry, SystemFontRegistry};
pub use github::{GitHubClient, Release, ReleaseAsset, ReleaseSource};
pub use net::{Downloader, HttpClient};
pub use provision::{Backends, FontOutcome, Provisioner, RunSummary};
