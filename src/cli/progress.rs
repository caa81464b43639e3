//! Terminal front-end for shell events
//!
//! Renders the events the updater and the LCU bridge emit, adapting to the
//! output context:
//! - TTY mode: progress bar for the download, plain lines otherwise
//! - Non-TTY mode: one line per distinct progress value
//! - Robot mode: every event as a JSON line on stdout
//! - Quiet mode: no output

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use serde_json::Value;

use crate::events::{self, EventEmitter, UiEvent};
use crate::lcu::LcuEvent;
use crate::updater::VersionInfo;

/// Output mode based on terminal capabilities and user preferences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressMode {
    Tty,
    NonTty,
    Robot,
    Quiet,
}

impl ProgressMode {
    /// Detect the appropriate mode based on environment
    #[must_use]
    pub fn detect(robot_mode: bool, quiet: bool) -> Self {
        if quiet {
            Self::Quiet
        } else if robot_mode {
            Self::Robot
        } else if std::io::stderr().is_terminal() {
            Self::Tty
        } else {
            Self::NonTty
        }
    }
}

/// Renders [`UiEvent`]s to the terminal.
pub struct EventRenderer {
    mode: ProgressMode,
    bar: Mutex<Option<ProgressBar>>,
    last_progress: Mutex<Option<u64>>,
}

impl EventRenderer {
    #[must_use]
    pub fn new(robot_mode: bool, quiet: bool) -> Self {
        Self::with_mode(ProgressMode::detect(robot_mode, quiet))
    }

    #[must_use]
    pub const fn with_mode(mode: ProgressMode) -> Self {
        Self {
            mode,
            bar: Mutex::new(None),
            last_progress: Mutex::new(None),
        }
    }

    #[must_use]
    pub const fn mode(&self) -> ProgressMode {
        self.mode
    }

    pub fn render(&self, event: &UiEvent) {
        match self.mode {
            ProgressMode::Quiet => {}
            ProgressMode::Robot => {
                if let Ok(json) = serde_json::to_string(event) {
                    println!("{json}");
                }
            }
            ProgressMode::Tty => self.render_tty(event),
            ProgressMode::NonTty => self.render_plain(event),
        }
    }

    fn render_tty(&self, event: &UiEvent) {
        match event.name.as_str() {
            events::UPDATE_PROGRESS => {
                let percent = event.payload.as_u64().unwrap_or(0);
                let mut bar = self.bar.lock();
                let bar = bar.get_or_insert_with(new_download_bar);
                bar.set_position(percent);
            }
            events::UPDATE_COMPLETE => {
                if let Some(bar) = self.bar.lock().take() {
                    bar.finish_with_message("Installer started");
                } else {
                    eprintln!("Installer started");
                }
            }
            _ => {
                if let Some(line) = describe(event) {
                    println!("{line}");
                }
            }
        }
    }

    fn render_plain(&self, event: &UiEvent) {
        if event.name == events::UPDATE_PROGRESS {
            let percent = event.payload.as_u64().unwrap_or(0);
            let mut last = self.last_progress.lock();
            if *last != Some(percent) {
                *last = Some(percent);
                eprintln!("[lcu-events] Downloading update: {percent}%");
            }
            return;
        }
        if event.name == events::UPDATE_COMPLETE {
            eprintln!("[lcu-events] Installer started");
            return;
        }
        if let Some(line) = describe(event) {
            println!("{line}");
        }
    }
}

impl EventEmitter for EventRenderer {
    fn emit(&self, name: &str, payload: Value) {
        self.render(&UiEvent::new(name, payload));
    }
}

fn new_download_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::default_bar()
        .template("Downloading update [{bar:40.cyan/blue}] {pos}%")
        .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("█▓▒░"));
    bar.set_style(style);
    bar
}

/// Human-readable line for an event, if it has one.
#[must_use]
pub fn describe(event: &UiEvent) -> Option<String> {
    match event.name.as_str() {
        events::VERSION_INFO => {
            let info: VersionInfo = serde_json::from_value(event.payload.clone()).ok()?;
            if info.has_update {
                Some(format!(
                    "Update available: {} (current {})\nRun `lcu-events update` to install.",
                    info.update_available, info.version
                ))
            } else {
                Some(format!("You are up to date ({})", info.version))
            }
        }
        events::LCU_EVENT => {
            let lcu: LcuEvent = serde_json::from_value(event.payload.clone()).ok()?;
            Some(format!("[{}] {} {}", lcu.event_type, lcu.uri, lcu.data))
        }
        _ => None,
    }
}
