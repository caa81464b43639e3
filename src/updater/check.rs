//! Startup update check

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::error::Result;
use crate::events::{self, EventEmitter};

use super::{ReleaseClient, VersionInfo};

/// Background check that reports `version-info` once per run.
#[derive(Clone)]
pub struct UpdateChecker {
    client: ReleaseClient,
    current_version: String,
    startup_delay: Duration,
    emitter: Arc<dyn EventEmitter>,
}

impl UpdateChecker {
    pub fn new(
        client: ReleaseClient,
        current_version: impl Into<String>,
        emitter: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            client,
            current_version: current_version.into(),
            startup_delay: Duration::ZERO,
            emitter,
        }
    }

    /// Wait this long before querying, so the check does not compete with startup.
    #[must_use]
    pub const fn with_startup_delay(mut self, delay: Duration) -> Self {
        self.startup_delay = delay;
        self
    }

    /// Query the latest release and build the version report.
    pub fn fetch_version_info(&self) -> Result<VersionInfo> {
        let release = self.client.get_latest_release()?;
        Ok(VersionInfo::compare(&self.current_version, &release.tag_name))
    }

    /// Sleep, check, then emit `version-info`.
    ///
    /// Failures are logged and swallowed; no event is emitted in that case.
    pub fn check_for_updates(&self) {
        if !self.startup_delay.is_zero() {
            std::thread::sleep(self.startup_delay);
        }

        let info = match self.fetch_version_info() {
            Ok(info) => info,
            Err(err) => {
                tracing::error!("Error checking for updates: {err}");
                return;
            }
        };

        if info.has_update {
            tracing::info!(
                current = %info.version,
                latest = %info.update_available,
                "update available"
            );
        } else {
            tracing::debug!(current = %info.version, "up to date");
        }

        events::emit_json(self.emitter.as_ref(), events::VERSION_INFO, &info);
    }

    /// Run [`check_for_updates`](Self::check_for_updates) on a background thread.
    pub fn spawn(self) -> Result<JoinHandle<()>> {
        let handle = std::thread::Builder::new()
            .name("update-check".to_string())
            .spawn(move || self.check_for_updates())?;
        Ok(handle)
    }
}
