//! Event emission towards the presentation layer.
//!
//! The shell never talks to its front-end directly: every observable effect
//! of the updater and the LCU bridge is a named event with a JSON payload
//! published through an [`EventEmitter`]. Emitters must tolerate concurrent
//! publishers, since the startup check runs on its own thread.

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;

/// Result of an update check, payload is a `VersionInfo`.
pub const VERSION_INFO: &str = "version-info";
/// Download progress, payload is an integer percentage.
pub const UPDATE_PROGRESS: &str = "update-progress";
/// Installer launched, payload is `null`.
pub const UPDATE_COMPLETE: &str = "update-complete";
/// LCU event forwarded verbatim, payload is `{ uri, eventType, data }`.
pub const LCU_EVENT: &str = "lcu-event";

/// Thread-safe publish operation to the presentation layer.
pub trait EventEmitter: Send + Sync {
    fn emit(&self, name: &str, payload: Value);
}

/// Serialize `payload` and emit it. Serialization failures are logged, not returned.
pub fn emit_json<T: Serialize + ?Sized>(emitter: &dyn EventEmitter, name: &str, payload: &T) {
    match serde_json::to_value(payload) {
        Ok(value) => emitter.emit(name, value),
        Err(err) => {
            tracing::error!(event = name, error = %err, "failed to serialize event payload");
        }
    }
}

/// An emitted event with its arrival time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiEvent {
    pub name: String,
    pub payload: Value,
    pub emitted_at: DateTime<Utc>,
}

impl UiEvent {
    #[must_use]
    pub fn new(name: &str, payload: Value) -> Self {
        Self {
            name: name.to_string(),
            payload,
            emitted_at: Utc::now(),
        }
    }
}

/// Forwards events over a channel to whichever thread owns the front-end.
#[derive(Debug, Clone)]
pub struct ChannelEmitter {
    tx: Sender<UiEvent>,
}

impl ChannelEmitter {
    /// Create an emitter and the receiving end of its unbounded channel.
    #[must_use]
    pub fn channel() -> (Self, Receiver<UiEvent>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }
}

impl EventEmitter for ChannelEmitter {
    fn emit(&self, name: &str, payload: Value) {
        if self.tx.send(UiEvent::new(name, payload)).is_err() {
            tracing::debug!(event = name, "event receiver gone, dropping event");
        }
    }
}

/// Keeps every event in memory. Used by tests and headless hosts.
#[derive(Debug, Default)]
pub struct RecordingEmitter {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingEmitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all events emitted so far.
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().clone()
    }

    /// Payloads of every event with the given name, in emission order.
    pub fn payloads(&self, name: &str) -> Vec<Value> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.payload.clone())
            .collect()
    }

    /// Event names in emission order.
    pub fn names(&self) -> Vec<String> {
        self.events.lock().iter().map(|e| e.name.clone()).collect()
    }
}

impl EventEmitter for RecordingEmitter {
    fn emit(&self, name: &str, payload: Value) {
        self.events.lock().push(UiEvent::new(name, payload));
    }
}
