//! Bridge between an LCU client and the presentation layer.
//!
//! The LCU connection itself (lockfile discovery, authentication, the
//! WebSocket subscription) lives in an external client behind the
//! [`LcuClient`] trait. This module only wires that client into the shell
//! lifecycle and forwards every event verbatim as `lcu-event`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::events::{self, EventEmitter};

/// One event received from the League client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcuEvent {
    pub uri: String,
    pub event_type: String,
    pub data: Value,
}

pub type EventCallback = Box<dyn Fn(LcuEvent) + Send + Sync>;

/// The external LCU client contract.
pub trait LcuClient: Send {
    /// Connect to the running client, waiting for it when configured to.
    fn connect(&mut self) -> Result<()>;

    /// Deliver every subsequent event to `callback`.
    fn subscribe_to_all(&mut self, callback: EventCallback) -> Result<()>;

    fn disconnect(&mut self);
}

/// Owns the client for the lifetime of the shell.
pub struct LcuBridge {
    client: Box<dyn LcuClient>,
    connected: bool,
}

impl LcuBridge {
    pub fn new(client: Box<dyn LcuClient>) -> Self {
        Self {
            client,
            connected: false,
        }
    }

    /// Connect and forward all events to `emitter`.
    ///
    /// Failures are logged and leave the shell running without LCU events.
    /// Returns whether the client connected.
    pub fn start(&mut self, emitter: Arc<dyn EventEmitter>) -> bool {
        if let Err(err) = self.client.connect() {
            tracing::error!("Failed to connect: {err}");
            return false;
        }
        self.connected = true;

        let forward: EventCallback = Box::new(move |event| {
            events::emit_json(emitter.as_ref(), events::LCU_EVENT, &event);
        });
        if let Err(err) = self.client.subscribe_to_all(forward) {
            tracing::error!("Failed to subscribe to events: {err}");
        }
        true
    }

    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.connected
    }

    /// Disconnect if a connection was made.
    pub fn stop(&mut self) {
        if self.connected {
            self.client.disconnect();
            self.connected = false;
            tracing::debug!("LCU client disconnected");
        }
    }
}
