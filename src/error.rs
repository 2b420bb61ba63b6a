//! Error types for the mirror.

use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for mirror operations
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// The HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Transport-level failure (DNS, TLS, timeout, truncated body)
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with anything other than 200
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },

    /// The start page could not be fetched; the run cannot continue
    #[error("failed to fetch the starting page {url}")]
    StartPage {
        url: String,
        #[source]
        source: Box<Error>,
    },

    /// The start page has no navigation region; the run cannot continue
    #[error("navigation element <{tag} id=\"{id}\"> not found on {url}")]
    NavigationMissing { tag: String, id: String, url: String },

    /// The page path would land outside the output root
    #[error("page path {path} is outside the mirrored prefix {prefix}")]
    OutsidePrefix { path: String, prefix: String },

    #[error("asset URL {0} has no file name")]
    NoFileName(String),

    #[error("invalid URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid request header {0:?}")]
    InvalidHeader(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize run summary: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Fatal errors abort the whole run; everything else is skipped per page or asset.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::StartPage { .. } | Error::NavigationMissing { .. } | Error::Client(_)
        )
    }
}
