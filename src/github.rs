//! GitHub API client for release packages.
//!
//! Resolves the latest release of a repository and picks the package asset
//! to install.

use std::env;
use std::time::Instant;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{ProvisionError, Result};
use crate::net::{HttpClient, network_error};

/// Environment variable holding an optional API token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";

/// Release metadata from `releases/latest`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Tag the release was cut from.
    pub tag_name: String,
    /// Attached files, in API order.
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// File name.
    pub name: String,
    /// Direct download URL.
    pub browser_download_url: String,
    /// Size in bytes.
    #[serde(default)]
    pub size: u64,
}

impl Release {
    /// Returns the first asset whose name ends with `suffix`.
    ///
    /// API order decides between several matches.
    #[must_use]
    pub fn select_asset(&self, suffix: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| a.name.ends_with(suffix))
    }
}

/// Source of latest-release metadata.
pub trait ReleaseSource {
    /// Returns the latest published release of `repo` (`owner/repo`).
    fn latest_release(&self, repo: &str) -> Result<Release>;
}

/// GitHub REST client.
pub struct GitHubClient<'a> {
    /// Shared HTTP client.
    http: &'a HttpClient,
    /// API base URL without trailing slash.
    api_base: String,
    /// Optional bearer token.
    token: Option<String>,
}

impl<'a> GitHubClient<'a> {
    /// Creates a client, picking up `GITHUB_TOKEN` when set.
    #[must_use]
    pub fn new(http: &'a HttpClient, api_base: &str) -> Self {
        assert!(!api_base.is_empty(), "API base must not be empty");

        let token = env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty());

        Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Returns the `releases/latest` URL for `repo`.
    #[must_use]
    pub fn latest_release_url(&self, repo: &str) -> String {
        format!("{}/repos/{}/releases/latest", self.api_base, repo)
    }
}

impl ReleaseSource for GitHubClient<'_> {
    fn latest_release(&self, repo: &str) -> Result<Release> {
        assert!(!repo.is_empty(), "Repository must not be empty");

        let url = self.latest_release_url(repo);
        debug!("GET {}", url);
        let start = Instant::now();

        let mut request = self
            .http
            .inner()
            .get(&url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().map_err(|e| {
            debug!("HTTP request failed: {}", e);
            network_error(&url, &e)
        })?;

        let status = response.status();
        debug!("Response: {} in {:?}", status, start.elapsed());

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProvisionError::InvalidResponse {
                url,
                message: "repository has no published release".to_string(),
            });
        }

        if status == reqwest::StatusCode::FORBIDDEN {
            let exhausted = response
                .headers()
                .get("x-ratelimit-remaining")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v == "0");
            if exhausted {
                debug!("GitHub rate limit exceeded");
                return Err(ProvisionError::RateLimited);
            }
        }

        if !status.is_success() {
            return Err(ProvisionError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let release: Release = response.json().map_err(|e| {
            debug!("Failed to parse release JSON: {}", e);
            ProvisionError::InvalidResponse {
                url: url.clone(),
                message: format!("not a release object: {}", e),
            }
        })?;

        info!(
            "Latest release of {} is {} with {} asset(s)",
            repo,
            release.tag_name,
            release.assets.len()
        );
        Ok(release)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELEASE_JSON: &str = r#"{
        "tag_name": "v1.4.0",
        "name": "1.4.0",
        "draft": false,
        "assets": [
            {"name": "checksums.txt", "browser_download_url": "https://dl/checksums.txt", "size": 120},
            {"name": "rat-theme-1.4.0.vsix", "browser_download_url": "https://dl/rat-theme-1.4.0.vsix", "size": 2048},
            {"name": "rat-theme-1.4.0-web.vsix", "browser_download_url": "https://dl/rat-theme-1.4.0-web.vsix"}
        ]
    }"#;

    fn parse(body: &str) -> serde_json::Result<Release> {
        serde_json::from_str(body)
    }

    #[test]
    fn test_parse_release() {
        let release = parse(RELEASE_JSON).unwrap();
        assert_eq!(release.tag_name, "v1.4.0");
        assert_eq!(release.assets.len(), 3);
        assert_eq!(release.assets[2].size, 0);
    }

    #[test]
    fn test_select_first_match_in_api_order() {
        let release = parse(RELEASE_JSON).unwrap();
        let asset = release.select_asset(".vsix").unwrap();
        assert_eq!(asset.name, "rat-theme-1.4.0.vsix");
    }

    #[test]
    fn test_select_no_match() {
        let release = parse(RELEASE_JSON).unwrap();
        assert!(release.select_asset(".zip").is_none());
    }

    #[test]
    fn test_release_without_assets() {
        let release = parse(r#"{"tag_name": "v0.1.0"}"#).unwrap();
        assert!(release.assets.is_empty());
        assert!(release.select_asset(".vsix").is_none());
    }

    #[test]
    fn test_parse_rejects_error_body() {
        assert!(parse(r#"{"message": "Not Found"}"#).is_err());
    }

    #[test]
    fn test_latest_release_url() {
        let http = HttpClient::new().unwrap();
        let client = GitHubClient::new(&http, "https://api.github.com/");
        assert_eq!(
            client.latest_release_url("owner/repo"),
            "https://api.github.com/repos/owner/repo/releases/latest"
        );
    }
}
