use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResponderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Dedup store I/O error at {}: {source}", path.display())]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Dedup store at {} is not valid JSON: {source}", path.display())]
    StoreFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Inbox error: {0}")]
    Inbox(#[source] anyhow::Error),
}
