use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::domain::SourceKind;

#[derive(Debug, Error, Diagnostic)]
pub enum DownloaderError {
    #[error("missing credential: {0}")]
    #[diagnostic(help("pass --api-key or set BIOPORTAL_API_KEY"))]
    MissingCredential(String),

    #[error("invalid ontology name: {0}")]
    InvalidOntologyName(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned status {status}: {message}")]
    HttpStatus {
        url: String,
        status: u16,
        message: String,
    },

    #[error("filesystem error: {0}")]
    Filesystem(String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("etcd request failed: {0}")]
    CoordinationHttp(String),

    #[error("etcd returned status {status}: {message}")]
    CoordinationStatus { status: u16, message: String },

    #[error("{kind} download failed")]
    SourceFailed {
        kind: SourceKind,
        #[source]
        error: Box<DownloaderError>,
    },

    #[error("{0} task panicked")]
    TaskPanicked(SourceKind),
}

impl DownloaderError {
    /// Unwraps `SourceFailed` down to the error that caused it.
    pub fn root(&self) -> &DownloaderError {
        match self {
            DownloaderError::SourceFailed { error, .. } => error.root(),
            other => other,
        }
    }
}
