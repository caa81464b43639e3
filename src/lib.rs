pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod lcu;
pub mod updater;

pub use error::{LcuEventsError, Result};

/// Package version from Cargo.toml, compared against release tags.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
