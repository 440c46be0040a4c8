use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures from the persistence backends and the browser host.
///
/// The page logic itself never surfaces these: missing values fall back to
/// defaults and failed writes are logged.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to access {path}: {source}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("page layout is invalid: {0}")]
    Layout(String),

    #[error("{0} is unavailable")]
    HostUnavailable(&'static str),

    #[error("failed to register {event} listener")]
    Listener { event: &'static str },
}

impl Error {
    pub(crate) fn store_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::StoreIo {
            path: path.into(),
            source,
        }
    }
}
