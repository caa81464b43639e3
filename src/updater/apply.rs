//! Download, launch and hand off to the installer

use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{LcuEventsError, Result};
use crate::events::{self, EventEmitter};

use super::{ReleaseClient, current_installer_asset_name};

/// Read buffer size for the installer download.
pub const DOWNLOAD_CHUNK_SIZE: usize = 32 * 1024;

/// Starts the downloaded installer without waiting for it.
pub trait InstallerLauncher: Send + Sync {
    fn launch(&self, path: &Path) -> Result<()>;
}

/// Spawns the installer as a detached child process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl InstallerLauncher for ProcessLauncher {
    fn launch(&self, path: &Path) -> Result<()> {
        let child = Command::new(path)
            .spawn()
            .map_err(|source| LcuEventsError::Launch {
                path: path.display().to_string(),
                source,
            })?;
        tracing::debug!(pid = child.id(), "installer started");
        Ok(())
    }
}

/// Terminates the running process once the installer has been started.
pub trait ProcessExit: Send + Sync {
    fn exit(&self, code: i32);
}

/// Calls [`std::process::exit`]. Skips the LCU disconnect hook.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExit;

impl ProcessExit for SystemExit {
    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Percentage of `content_length` downloaded, floored and capped at 100.
#[must_use]
pub fn progress_percent(downloaded: u64, content_length: u64) -> u64 {
    if content_length == 0 {
        return 0;
    }
    (downloaded.saturating_mul(100) / content_length).min(100)
}

/// Copy `reader` into `writer` chunk by chunk, reporting progress after each chunk.
///
/// With an unknown or zero content length every chunk reports 0 and a
/// single 100 is reported at end of stream. Returns the byte count.
pub fn stream_with_progress<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    content_length: Option<u64>,
    mut on_progress: F,
) -> Result<u64>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
    F: FnMut(u64),
{
    let known_length = content_length.filter(|&len| len > 0);
    let mut buffer = vec![0u8; DOWNLOAD_CHUNK_SIZE];
    let mut downloaded = 0u64;

    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };

        let written = writer.write(&buffer[..read])?;
        if written != read {
            return Err(LcuEventsError::ShortWrite);
        }

        downloaded += read as u64;
        on_progress(known_length.map_or(0, |len| progress_percent(downloaded, len)));
    }

    if known_length.is_none() {
        on_progress(100);
    }
    writer.flush()?;

    Ok(downloaded)
}

/// Applies the latest release: download, launch, exit.
pub struct Updater {
    client: ReleaseClient,
    current_version: String,
    download_dir: Option<PathBuf>,
    emitter: Arc<dyn EventEmitter>,
    launcher: Arc<dyn InstallerLauncher>,
    exit: Arc<dyn ProcessExit>,
}

impl Updater {
    pub fn new(
        client: ReleaseClient,
        current_version: impl Into<String>,
        emitter: Arc<dyn EventEmitter>,
    ) -> Self {
        Self {
            client,
            current_version: current_version.into(),
            download_dir: None,
            emitter,
            launcher: Arc::new(ProcessLauncher),
            exit: Arc::new(SystemExit),
        }
    }

    /// Download into `dir` instead of the system temp directory.
    #[must_use]
    pub fn with_download_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.download_dir = dir;
        self
    }

    #[must_use]
    pub fn with_launcher(mut self, launcher: Arc<dyn InstallerLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    #[must_use]
    pub fn with_exit(mut self, exit: Arc<dyn ProcessExit>) -> Self {
        self.exit = exit;
        self
    }

    /// Download the installer for this platform, start it and exit with code 0.
    ///
    /// Every failure is returned unchanged. The temporary installer is
    /// removed on failure and kept once it has been launched.
    pub fn update_application(&self) -> Result<()> {
        self.update_with(|| Ok(self.create_temp_file()?.into_parts()))
    }

    fn update_with<W, F>(&self, open_installer: F) -> Result<()>
    where
        W: Write,
        F: FnOnce() -> Result<(W, tempfile::TempPath)>,
    {
        let release = self.client.get_latest_release()?;

        let wanted = current_installer_asset_name(&self.current_version);
        let asset = release
            .find_asset(&wanted)
            .ok_or(LcuEventsError::NoSuitableAsset)?;
        tracing::info!(asset = %asset.name, tag = %release.tag_name, "downloading update");

        let mut response = self.client.download(&asset.download_url)?;
        let content_length = response.content_length();

        let (mut file, installer) = open_installer()?;
        let emitter = self.emitter.as_ref();
        let downloaded = stream_with_progress(&mut response, &mut file, content_length, |p| {
            events::emit_json(emitter, events::UPDATE_PROGRESS, &p);
        })?;

        // Close the handle; the path is still deleted on drop.
        drop(file);
        mark_executable(&installer)?;
        self.launcher.launch(&installer)?;

        // The installer runs from this file, so it must outlive us.
        let path = installer
            .keep()
            .map_err(|err| LcuEventsError::Io(err.error))?;
        tracing::info!(path = %path.display(), bytes = downloaded, "installer launched");

        self.emitter.emit(events::UPDATE_COMPLETE, Value::Null);
        self.exit.exit(0);
        Ok(())
    }

    fn create_temp_file(&self) -> Result<tempfile::NamedTempFile> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("update-").suffix(".exe");
        let file = match &self.download_dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        Ok(file)
    }
}

#[cfg(unix)]
fn mark_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perms = std::fs::metadata(path)?.permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms)?;
    Ok(())
}

#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn mark_executable(_path: &Path) -> Result<()> {
    Ok(())
}
