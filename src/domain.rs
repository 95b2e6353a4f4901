use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::DownloaderError;

static ONTOLOGY_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_\-]*$").expect("valid ontology regex"));

/// Identifier of an ontology in a catalog, e.g. `GO` or `so`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OntologyName(String);

impl OntologyName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalog acronyms are upper case (`GO`, `SO`).
    pub fn acronym(&self) -> String {
        self.0.to_uppercase()
    }

    pub fn file_stem(&self) -> String {
        self.0.to_lowercase()
    }

    pub fn file_name(&self) -> String {
        format!("{}.obo", self.file_stem())
    }
}

impl fmt::Display for OntologyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OntologyName {
    type Err = DownloaderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if !ONTOLOGY_NAME.is_match(trimmed) {
            return Err(DownloaderError::InvalidOntologyName(value.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }
}

/// Origin of a download, used as the `source` field in logs and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Purl,
    Bioportal,
    Github,
    Box,
    Ebi,
}

impl SourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Purl => "purl",
            SourceKind::Bioportal => "bioportal",
            SourceKind::Github => "github",
            SourceKind::Box => "box",
            SourceKind::Ebi => "ebi",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalRequest {
    pub url: String,
    pub authorization: Option<String>,
    pub destination: PathBuf,
}

impl RetrievalRequest {
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            authorization: None,
            destination: destination.into(),
        }
    }

    pub fn with_authorization(mut self, value: impl Into<String>) -> Self {
        self.authorization = Some(value.into());
        self
    }
}

/// Kind of a member found while scanning an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Directory,
    Regular,
    Other(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Fatal,
    Panic,
}

impl LogLevel {
    /// `fatal` and `panic` only let errors through.
    pub fn filter_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Fatal | LogLevel::Panic => "error",
        }
    }
}
