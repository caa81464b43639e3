use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LcuEventsError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to get latest release: {0}")]
    ReleaseQuery(String),

    #[error("download failed: HTTP {0}")]
    Download(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no suitable update found for your platform")]
    NoSuitableAsset,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("short write")]
    ShortWrite,

    #[error("failed to launch installer {path}: {source}")]
    Launch {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("LCU error: {0}")]
    Lcu(String),
}

pub type Result<T> = std::result::Result<T, LcuEventsError>;
