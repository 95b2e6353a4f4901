use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};

use crate::domain::{LogLevel, OntologyName};
use crate::error::DownloaderError;

pub const DEFAULT_DOWNLOAD_FOLDER: &str = "/data";
pub const BIOPORTAL_URL: &str = "http://data.bioontology.org/ontologies";
pub const PURL_URL: &str = "http://purl.obolibrary.org/obo";
pub const GITHUB_API_URL: &str = "https://api.github.com";
pub const MIGRATION_ARCHIVE_URL: &str =
    "https://northwestern.box.com/shared/static/t35zifjta5l8nk3mxminfaff1dlhfitz.bz2";
pub const GPAD_URL: &str =
    "http://www.ebi.ac.uk/QuickGO/GAnnotation?format=gpa&limit=-1&db=dictyBase";

/// On-disk configuration. Every field is optional; command-line flags are
/// layered on top through [`ConfigOverrides`].
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    #[serde(default)]
    pub download_folder: Option<String>,
    #[serde(default)]
    pub migration_data: bool,
    #[serde(default)]
    pub obo: Vec<String>,
    #[serde(default)]
    pub bioportal: Vec<String>,
    #[serde(default)]
    pub github: Option<GithubSelection>,
    #[serde(default)]
    pub gpad: bool,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub log_level: Option<LogLevel>,
    #[serde(default)]
    pub etcd_host: Option<String>,
    #[serde(default)]
    pub etcd_port: Option<String>,
    #[serde(default)]
    pub endpoints: EndpointOverrides,
}

/// `true` fetches the whole repository listing, a list restricts it to
/// the named files.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum GithubSelection {
    Enabled(bool),
    Files(Vec<String>),
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct EndpointOverrides {
    #[serde(default)]
    pub bioportal: Option<String>,
    #[serde(default)]
    pub purl: Option<String>,
    #[serde(default)]
    pub github_api: Option<String>,
    #[serde(default)]
    pub migration_archive: Option<String>,
    #[serde(default)]
    pub gpad: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub bioportal: String,
    pub purl: String,
    pub github_api: String,
    pub migration_archive: String,
    pub gpad: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            bioportal: BIOPORTAL_URL.to_string(),
            purl: PURL_URL.to_string(),
            github_api: GITHUB_API_URL.to_string(),
            migration_archive: MIGRATION_ARCHIVE_URL.to_string(),
            gpad: GPAD_URL.to_string(),
        }
    }
}

impl Endpoints {
    fn with_overrides(overrides: EndpointOverrides) -> Self {
        let defaults = Self::default();
        let trim = |value: String| value.trim_end_matches('/').to_string();
        Self {
            bioportal: overrides.bioportal.map(trim).unwrap_or(defaults.bioportal),
            purl: overrides.purl.map(trim).unwrap_or(defaults.purl),
            github_api: overrides.github_api.map(trim).unwrap_or(defaults.github_api),
            migration_archive: overrides
                .migration_archive
                .unwrap_or(defaults.migration_archive),
            gpad: overrides.gpad.unwrap_or(defaults.gpad),
        }
    }
}

/// Values coming from the command line. `None`, `false` and empty lists
/// leave the file value alone.
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub download_folder: Option<String>,
    pub migration_data: bool,
    pub obo: Vec<String>,
    pub bioportal: Vec<String>,
    pub github: Option<Vec<String>>,
    pub gpad: bool,
    pub api_key: Option<String>,
    pub log_level: Option<LogLevel>,
    pub etcd_host: Option<String>,
    pub etcd_port: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinationConfig {
    pub host: String,
    pub port: String,
}

impl CoordinationConfig {
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub download_folder: Utf8PathBuf,
    pub purl: Vec<OntologyName>,
    pub bioportal: Vec<OntologyName>,
    /// `None` disables the repository listing, an empty list fetches all.
    pub github: Option<Vec<String>>,
    pub migration_data: bool,
    pub gpad: bool,
    pub api_key: Option<String>,
    pub log_level: LogLevel,
    pub coordination: Option<CoordinationConfig>,
    pub endpoints: Endpoints,
}

impl ResolvedConfig {
    pub fn has_sources(&self) -> bool {
        !self.purl.is_empty()
            || !self.bioportal.is_empty()
            || self.github.is_some()
            || self.migration_data
            || self.gpad
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn resolve(
        path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<ResolvedConfig, DownloaderError> {
        let config = match path {
            Some(path) => Self::read(PathBuf::from(path))?,
            None => Config::default(),
        };
        Self::resolve_config(config.merge(overrides))
    }

    fn read(path: PathBuf) -> Result<Config, DownloaderError> {
        let content =
            fs::read_to_string(&path).map_err(|_| DownloaderError::ConfigRead(path.clone()))?;
        serde_json::from_str(&content).map_err(|err| DownloaderError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(config: Config) -> Result<ResolvedConfig, DownloaderError> {
        let purl = parse_names(&config.obo)?;
        let bioportal = parse_names(&config.bioportal)?;
        let api_key = config.api_key.and_then(non_blank);

        if !bioportal.is_empty() && api_key.is_none() {
            return Err(DownloaderError::MissingCredential(
                "bioportal api-key is not set".to_string(),
            ));
        }

        let github = match config.github {
            None | Some(GithubSelection::Enabled(false)) => None,
            Some(GithubSelection::Enabled(true)) => Some(Vec::new()),
            Some(GithubSelection::Files(files)) => {
                Some(files.into_iter().filter_map(non_blank).collect())
            }
        };

        let download_folder = config
            .download_folder
            .and_then(non_blank)
            .unwrap_or_else(|| DEFAULT_DOWNLOAD_FOLDER.to_string());

        let coordination = match (
            config.etcd_host.and_then(non_blank),
            config.etcd_port.and_then(non_blank),
        ) {
            (Some(host), Some(port)) => Some(CoordinationConfig { host, port }),
            _ => None,
        };

        Ok(ResolvedConfig {
            download_folder: Utf8PathBuf::from(download_folder),
            purl,
            bioportal,
            github,
            migration_data: config.migration_data,
            gpad: config.gpad,
            api_key,
            log_level: config.log_level.unwrap_or_default(),
            coordination,
            endpoints: Endpoints::with_overrides(config.endpoints),
        })
    }
}

impl Config {
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if overrides.download_folder.is_some() {
            self.download_folder = overrides.download_folder;
        }
        self.migration_data |= overrides.migration_data;
        if !overrides.obo.is_empty() {
            self.obo = overrides.obo;
        }
        if !overrides.bioportal.is_empty() {
            self.bioportal = overrides.bioportal;
        }
        if let Some(files) = overrides.github {
            self.github = Some(GithubSelection::Files(files));
        }
        self.gpad |= overrides.gpad;
        if overrides.api_key.is_some() {
            self.api_key = overrides.api_key;
        }
        if overrides.log_level.is_some() {
            self.log_level = overrides.log_level;
        }
        if overrides.etcd_host.is_some() {
            self.etcd_host = overrides.etcd_host;
        }
        if overrides.etcd_port.is_some() {
            self.etcd_port = overrides.etcd_port;
        }
        self
    }
}

// Blank entries are dropped so `--obo ""` behaves like no names at all.
fn parse_names(values: &[String]) -> Result<Vec<OntologyName>, DownloaderError> {
    values
        .iter()
        .filter(|value| !value.trim().is_empty())
        .map(|value| value.parse())
        .collect()
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
