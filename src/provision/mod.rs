//! Provisioning pipeline.
//!
//! Runs the steps in a fixed order on the calling thread:
//!
//! 1. **Preflight**: the editor CLI must be on PATH
//! 2. **Scratch**: create a temporary workspace
//! 3. **Settings**: overwrite the editor's settings.json
//! 4. **Font**: install and register unless already present
//! 5. **Manifest**: install listed extensions (fetch failure is tolerated)
//! 6. **Releases**: install the package from each repository's latest release
//! 7. **Cleanup**: remove the workspace on every exit path
//!
//! Any other failure aborts the run. Nothing is retried.

mod extensions;
mod font;
mod progress;
mod scratch;
mod settings;

use std::path::PathBuf;

use tracing::info;

pub use extensions::{install_manifest_extensions, install_release_extensions, parse_manifest};
pub use font::{FontOutcome, FontSpec, install_font};
pub use progress::Progress;
pub use scratch::{SCRATCH_PREFIX, ScratchDir};
pub use settings::install_settings;

use crate::config::{Config, TargetPaths};
use crate::editor_cli::ExtensionHost;
use crate::error::Result;
use crate::font_registry::FontRegistry;
use crate::github::ReleaseSource;
use crate::net::Downloader;

/// Steps reported through `Progress` after preflight.
const REPORTED_STEPS: u32 = 5;

/// External services the pipeline talks to.
#[derive(Clone, Copy)]
pub struct Backends<'a> {
    /// Plain HTTP downloads.
    pub downloader: &'a dyn Downloader,
    /// Latest-release metadata.
    pub releases: &'a dyn ReleaseSource,
    /// Editor CLI.
    pub host: &'a dyn ExtensionHost,
    /// Platform font database.
    pub fonts: &'a dyn FontRegistry,
}

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Settings file written.
    pub settings_file: PathBuf,
    /// Result of the font step.
    pub font: FontOutcome,
    /// Identifiers installed from the manifest; `None` if it was skipped.
    pub manifest_extensions: Option<Vec<String>>,
    /// Release packages installed, by file name.
    pub release_extensions: Vec<String>,
}

/// One provisioning run.
pub struct Provisioner<'a> {
    config: &'a Config,
    paths: TargetPaths,
    backends: Backends<'a>,
    quiet: bool,
}

impl<'a> Provisioner<'a> {
    /// Creates a provisioner.
    #[must_use]
    pub fn new(config: &'a Config, paths: TargetPaths, backends: Backends<'a>) -> Self {
        Self {
            config,
            paths,
            backends,
            quiet: false,
        }
    }

    /// Keeps progress lines off stderr.
    #[must_use]
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Runs the whole pipeline.
    ///
    /// The scratch directory is removed before this returns, whatever the
    /// outcome.
    ///
    /// # Errors
    /// The first fatal error; later steps are not attempted.
    pub fn run(&self) -> Result<RunSummary> {
        let tool = self.backends.host.preflight()?;
        info!("Preflight passed: {}", tool.display());

        let scratch = ScratchDir::create(&self.paths.scratch_root)?;
        let mut progress = Progress::new(REPORTED_STEPS);
        if self.quiet {
            progress = progress.quiet();
        }

        let result = self.run_steps(&scratch, &mut progress);

        progress.step("Cleaning up");
        scratch.cleanup();
        result
    }

    fn run_steps(&self, scratch: &ScratchDir, progress: &mut Progress) -> Result<RunSummary> {
        let config = self.config;
        let Backends {
            downloader,
            releases,
            host,
            fonts,
        } = self.backends;

        progress.step("Installing editor settings");
        install_settings(downloader, &config.settings_url, &self.paths.settings_file)?;

        progress.step("Installing font");
        let font = install_font(
            downloader,
            fonts,
            scratch,
            FontSpec {
                url: &config.font_url,
                file_name: &config.font_file,
                display_name: &config.font_name,
            },
            &self.paths.font_dir,
        )?;

        progress.step("Installing extensions from manifest");
        let manifest_extensions =
            install_manifest_extensions(downloader, host, &config.extensions_url)?;

        progress.step("Installing extensions from releases");
        let release_extensions = install_release_extensions(
            releases,
            downloader,
            host,
            scratch,
            &config.release_repos,
            &config.asset_suffix,
        )?;

        Ok(RunSummary {
            settings_file: self.paths.settings_file.clone(),
            font,
            manifest_extensions,
            release_extensions,
        })
    }
}
