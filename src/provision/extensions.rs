//! Extension installation from the manifest and from release packages.

use std::path::Path;

use tracing::{info, warn};

use super::scratch::ScratchDir;
use crate::editor_cli::{ExtensionHost, ExtensionTarget};
use crate::error::{ProvisionError, Result};
use crate::github::ReleaseSource;
use crate::net::Downloader;

/// Splits a manifest into extension identifiers.
///
/// Lines are trimmed and blank lines dropped; order and duplicates are kept.
#[must_use]
pub fn parse_manifest(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Installs every extension listed in the manifest at `url`.
///
/// Returns `None` when the manifest could not be fetched; that is the one
/// tolerated failure in a run.
///
/// # Errors
/// Any failed install.
pub fn install_manifest_extensions(
    downloader: &dyn Downloader,
    host: &dyn ExtensionHost,
    url: &str,
) -> Result<Option<Vec<String>>> {
    let text = match downloader.get_text(url) {
        Ok(text) => text,
        Err(e) => {
            warn!("Skipping manifest extensions, could not fetch {}: {}", url, e);
            return Ok(None);
        }
    };

    let ids = parse_manifest(&text);
    info!("Manifest lists {} extension(s)", ids.len());

    for id in &ids {
        host.install_extension(&ExtensionTarget::Marketplace(id.clone()))?;
    }

    Ok(Some(ids))
}

/// Installs the package asset from the latest release of each repository.
///
/// Returns the asset file names installed, in order.
///
/// # Errors
/// Release lookup, missing asset, download or install failures.
pub fn install_release_extensions(
    releases: &dyn ReleaseSource,
    downloader: &dyn Downloader,
    host: &dyn ExtensionHost,
    scratch: &ScratchDir,
    repos: &[String],
    suffix: &str,
) -> Result<Vec<String>> {
    let mut installed = Vec::with_capacity(repos.len());

    for repo in repos {
        let release = releases
            .latest_release(repo)
            .map_err(|e| ProvisionError::ReleaseLookup {
                repo: repo.clone(),
                cause: e.to_string(),
            })?;

        let asset = release
            .select_asset(suffix)
            .ok_or_else(|| ProvisionError::AssetNotFound {
                repo: repo.clone(),
                suffix: suffix.to_string(),
            })?;

        if asset.browser_download_url.trim().is_empty() {
            return Err(ProvisionError::InvalidResponse {
                url: format!("{} {}", repo, release.tag_name),
                message: format!("asset '{}' has no download URL", asset.name),
            });
        }

        let file_name = Path::new(&asset.name)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ProvisionError::InvalidResponse {
                url: asset.browser_download_url.clone(),
                message: format!("unusable asset name '{}'", asset.name),
            })?;

        info!(
            "Using {} ({} bytes) from {} {}",
            file_name, asset.size, repo, release.tag_name
        );

        let package = scratch.file(file_name);
        downloader.download_to(&asset.browser_download_url, &package)?;
        host.install_extension(&ExtensionTarget::Package(package))?;

        installed.push(file_name.to_string());
    }

    Ok(installed)
}
