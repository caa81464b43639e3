//! Mock release host and recording hooks shared by the integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use httpmock::prelude::*;
use serde::Serialize;

use lcu_events::error::Result;
use lcu_events::updater::{InstallerLauncher, ProcessExit, ReleaseClient};

pub const OWNER: &str = "Its-Haze";
pub const REPO: &str = "lcu-events";
pub const LATEST_PATH: &str = "/repos/Its-Haze/lcu-events/releases/latest";

/// GitHub release body as served by the mock host.
#[derive(Debug, Clone, Serialize)]
pub struct MockRelease {
    pub id: u64,
    pub tag_name: String,
    pub html_url: String,
    pub prerelease: bool,
    pub assets: Vec<MockAsset>,
}

impl MockRelease {
    pub fn new(tag: &str) -> Self {
        Self {
            id: 1,
            tag_name: tag.to_string(),
            html_url: format!("https://github.com/{OWNER}/{REPO}/releases/tag/{tag}"),
            prerelease: false,
            assets: Vec::new(),
        }
    }

    pub fn with_asset(mut self, asset: MockAsset) -> Self {
        self.assets.push(asset);
        self
    }
}

/// GitHub release asset as served by the mock host.
#[derive(Debug, Clone, Serialize)]
pub struct MockAsset {
    pub id: u64,
    pub name: String,
    pub browser_download_url: String,
    pub size: u64,
}

impl MockAsset {
    pub fn new(id: u64, name: &str, download_url: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            browser_download_url: download_url.to_string(),
            size: 0,
        }
    }
}

/// Serve `release` as the latest release.
pub fn mock_latest<'a>(server: &'a MockServer, release: &MockRelease) -> httpmock::Mock<'a> {
    let body = serde_json::to_value(release).unwrap();
    server.mock(|when, then| {
        when.method(GET).path(LATEST_PATH);
        then.status(200).json_body(body);
    })
}

/// Serve `data` as a binary download at `path`.
pub fn mock_download<'a>(server: &'a MockServer, path: &str, data: Vec<u8>) -> httpmock::Mock<'a> {
    server.mock(|when, then| {
        when.method(GET).path(path.to_string());
        then.status(200)
            .header("content-type", "application/octet-stream")
            .body(data);
    })
}

pub fn release_client(server: &MockServer) -> ReleaseClient {
    ReleaseClient::new(server.base_url(), OWNER, REPO).unwrap()
}

/// Records launch requests instead of spawning anything.
#[derive(Default)]
pub struct RecordingLauncher {
    pub launched: Mutex<Vec<PathBuf>>,
    pub fail: bool,
}

impl RecordingLauncher {
    pub fn failing() -> Self {
        Self {
            launched: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn launched(&self) -> Vec<PathBuf> {
        self.launched.lock().unwrap().clone()
    }
}

impl InstallerLauncher for RecordingLauncher {
    fn launch(&self, path: &Path) -> Result<()> {
        self.launched.lock().unwrap().push(path.to_path_buf());
        if self.fail {
            return Err(lcu_events::LcuEventsError::Launch {
                path: path.display().to_string(),
                source: std::io::Error::other("exec format error"),
            });
        }
        Ok(())
    }
}

/// Records exit codes instead of terminating the test process.
#[derive(Default)]
pub struct RecordingExit {
    pub codes: Mutex<Vec<i32>>,
}

impl RecordingExit {
    pub fn codes(&self) -> Vec<i32> {
        self.codes.lock().unwrap().clone()
    }
}

impl ProcessExit for RecordingExit {
    fn exit(&self, code: i32) {
        self.codes.lock().unwrap().push(code);
    }
}

pub fn hooks() -> (Arc<RecordingLauncher>, Arc<RecordingExit>) {
    (
        Arc::new(RecordingLauncher::default()),
        Arc::new(RecordingExit::default()),
    )
}

/// Number of entries in a directory.
pub fn entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).unwrap().count()
}
