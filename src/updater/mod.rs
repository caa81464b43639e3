//! Self-update for lcu-events.
//!
//! Two entry points share one release query against the GitHub API:
//! [`UpdateChecker`] reports whether a newer tag exists, [`Updater`]
//! downloads the platform installer, launches it and exits.

mod apply;
mod check;

pub use apply::{
    DOWNLOAD_CHUNK_SIZE, InstallerLauncher, ProcessExit, ProcessLauncher, SystemExit, Updater,
    progress_percent, stream_with_progress,
};
pub use check::UpdateChecker;

use serde::{Deserialize, Serialize};

use crate::config::UpdateConfig;
use crate::error::{LcuEventsError, Result};

const USER_AGENT: &str = concat!("lcu-events/", env!("CARGO_PKG_VERSION"));

/// Version report sent to the front-end after each check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionInfo {
    pub version: String,
    pub has_update: bool,
    pub update_available: String,
}

impl VersionInfo {
    /// Compare the running version against the latest release tag.
    ///
    /// Plain string inequality: any different non-empty tag counts as an
    /// update, including older or pre-release tags.
    #[must_use]
    pub fn compare(current: &str, latest_tag: &str) -> Self {
        let has_update = !latest_tag.is_empty() && latest_tag != current;
        Self {
            version: current.to_string(),
            has_update,
            update_available: if has_update {
                latest_tag.to_string()
            } else {
                String::new()
            },
        }
    }
}

/// Latest release as seen by the updater.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    pub tag_name: String,
    pub assets: Vec<ReleaseAsset>,
}

/// Asset attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
}

impl Release {
    /// First asset whose name matches exactly.
    #[must_use]
    pub fn find_asset(&self, name: &str) -> Option<&ReleaseAsset> {
        self.assets.iter().find(|a| a.name == name)
    }
}

/// Blocking client for the release host.
#[derive(Debug, Clone)]
pub struct ReleaseClient {
    client: reqwest::blocking::Client,
    api_base: String,
    owner: String,
    repo: String,
}

impl ReleaseClient {
    pub fn new(
        api_base: impl Into<String>,
        owner: impl Into<String>,
        repo: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            owner: owner.into(),
            repo: repo.into(),
        })
    }

    pub fn from_config(config: &UpdateConfig) -> Result<Self> {
        Self::new(&config.api_base, &config.owner, &config.repo)
    }

    #[must_use]
    pub fn latest_release_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base, self.owner, self.repo
        )
    }

    /// Fetch the latest release. No caching and no retry.
    pub fn get_latest_release(&self) -> Result<Release> {
        let url = self.latest_release_url();
        tracing::debug!(%url, "querying latest release");

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()?;

        if !response.status().is_success() {
            return Err(LcuEventsError::ReleaseQuery(response.status().to_string()));
        }

        let body = response.bytes()?;
        let raw: GitHubRelease = serde_json::from_slice(&body)?;
        Ok(raw.into_release())
    }

    /// Start downloading `url`, failing on transport error or non-success status.
    pub fn download(&self, url: &str) -> Result<reqwest::blocking::Response> {
        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(LcuEventsError::Download(response.status().to_string()));
        }
        Ok(response)
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRelease {
    #[serde(default)]
    tag_name: String,
    #[serde(default)]
    assets: Vec<GitHubAsset>,
}

#[derive(Debug, Deserialize)]
struct GitHubAsset {
    name: String,
    browser_download_url: String,
}

impl GitHubRelease {
    fn into_release(self) -> Release {
        Release {
            tag_name: self.tag_name,
            assets: self
                .assets
                .into_iter()
                .map(|a| ReleaseAsset {
                    name: a.name,
                    download_url: a.browser_download_url,
                })
                .collect(),
        }
    }
}

// --- Platform naming ---

/// Operating system name as used in release asset names (`windows`, `linux`, `darwin`).
#[must_use]
pub const fn platform_os() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else if cfg!(target_os = "macos") {
        "darwin"
    } else if cfg!(target_os = "freebsd") {
        "freebsd"
    } else {
        "unknown"
    }
}

/// CPU architecture as used in release asset names (`amd64`, `arm64`, `386`).
#[must_use]
pub const fn platform_arch() -> &'static str {
    if cfg!(target_arch = "x86_64") {
        "amd64"
    } else if cfg!(target_arch = "aarch64") {
        "arm64"
    } else if cfg!(target_arch = "x86") {
        "386"
    } else if cfg!(target_arch = "arm") {
        "arm"
    } else {
        "unknown"
    }
}

/// Installer asset name for a version and platform.
///
/// Always ends in `.exe`, whatever the host: releases only ship Windows
/// installers.
#[must_use]
pub fn installer_asset_name(version: &str, os: &str, arch: &str) -> String {
    format!("lcu-events_{version}_{os}_{arch}.exe")
}

/// Installer asset name for the running platform.
#[must_use]
pub fn current_installer_asset_name(version: &str) -> String {
    installer_asset_name(version, platform_os(), platform_arch())
}
