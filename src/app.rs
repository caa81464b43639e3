//! Application shell: owns the configuration, the event emitter and the
//! optional LCU client, and hands the updater its collaborators explicitly.

use std::sync::Arc;
use std::thread::JoinHandle;

use crate::config::Config;
use crate::error::Result;
use crate::events::EventEmitter;
use crate::lcu::{LcuBridge, LcuClient};
use crate::updater::{ReleaseClient, UpdateChecker, Updater};

pub struct App {
    config: Config,
    current_version: String,
    emitter: Arc<dyn EventEmitter>,
    lcu: Option<LcuBridge>,
    check: Option<JoinHandle<()>>,
}

impl App {
    pub fn new(config: Config, emitter: Arc<dyn EventEmitter>) -> Self {
        Self {
            config,
            current_version: crate::VERSION.to_string(),
            emitter,
            lcu: None,
            check: None,
        }
    }

    /// Attach the external LCU client started on [`startup`](Self::startup).
    #[must_use]
    pub fn with_lcu_client(mut self, client: Box<dyn LcuClient>) -> Self {
        self.lcu = Some(LcuBridge::new(client));
        self
    }

    /// Override the compiled-in version the updater compares against.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.current_version = version.into();
        self
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    pub fn release_client(&self) -> Result<ReleaseClient> {
        ReleaseClient::from_config(&self.config.update)
    }

    /// Checker wired to this shell's emitter, with the configured startup delay.
    pub fn checker(&self) -> Result<UpdateChecker> {
        Ok(UpdateChecker::new(
            self.release_client()?,
            self.current_version.clone(),
            Arc::clone(&self.emitter),
        )
        .with_startup_delay(self.config.update.startup_delay()))
    }

    /// Updater wired to this shell's emitter and download directory.
    pub fn updater(&self) -> Result<Updater> {
        Ok(Updater::new(
            self.release_client()?,
            self.current_version.clone(),
            Arc::clone(&self.emitter),
        )
        .with_download_dir(self.config.update.download_dir.clone()))
    }

    /// Spawn the background update check and connect the LCU client.
    pub fn startup(&mut self) -> Result<()> {
        if self.config.update.auto_check {
            self.check = Some(self.checker()?.spawn()?);
        } else {
            tracing::debug!("startup update check disabled");
        }

        if let Some(lcu) = &mut self.lcu {
            lcu.start(Arc::clone(&self.emitter));
        } else {
            tracing::info!("no LCU client attached, running without game events");
        }
        Ok(())
    }

    /// Whether the startup check has completed (or was never started).
    pub fn check_finished(&self) -> bool {
        self.check.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Block until the startup check completes.
    pub fn wait_for_check(&mut self) {
        if let Some(handle) = self.check.take() {
            if handle.join().is_err() {
                tracing::error!("update check thread panicked");
            }
        }
    }

    pub fn lcu_connected(&self) -> bool {
        self.lcu.as_ref().is_some_and(LcuBridge::is_connected)
    }

    /// Disconnect the LCU client if connected.
    pub fn shutdown(&mut self) {
        if let Some(lcu) = &mut self.lcu {
            lcu.stop();
        }
    }
}
