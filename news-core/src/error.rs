use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),
    #[error("feed parsing error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid feed url: {0}")]
    Url(#[from] url::ParseError),
    #[error("fetch task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("record store was already published")]
    AlreadyPublished,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("no record titled {0:?}")]
    NotFound(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("favorites file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to locate the configuration directory")]
    NoConfigDir,
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("credential variable {0} is not set")]
    MissingCredential(String),
    #[error("invalid feed endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}
