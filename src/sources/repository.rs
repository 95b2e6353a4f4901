use serde::Deserialize;

use crate::config::Endpoints;
use crate::domain::{RetrievalRequest, SourceKind};
use crate::error::DownloaderError;
use crate::folder::DownloadFolder;

use super::{TaskContext, TaskReport};

pub const REPOSITORY_OWNER: &str = "dictyBase";
pub const REPOSITORY_NAME: &str = "migration-data";
pub const REPOSITORY_PATH: &str = "ontologies";

/// One item of the GitHub "get repository content" response.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// Every file under the ontology folder of the migration-data repository.
#[derive(Debug, Clone, Default)]
pub struct RepositoryListing {
    files: Vec<String>,
}

impl RepositoryListing {
    /// An empty `files` list selects every file in the listing.
    pub fn new(files: Vec<String>) -> Self {
        Self { files }
    }

    pub fn listing_url(endpoints: &Endpoints) -> String {
        format!(
            "{}/repos/{REPOSITORY_OWNER}/{REPOSITORY_NAME}/contents/{REPOSITORY_PATH}",
            endpoints.github_api
        )
    }

    /// Keeps downloadable files, in listing order, honouring the filter.
    pub fn select(
        &self,
        entries: Vec<RepositoryEntry>,
        folder: &DownloadFolder,
    ) -> Result<Vec<RetrievalRequest>, DownloaderError> {
        let mut selected = Vec::new();
        let mut matched = Vec::new();
        for entry in entries {
            if entry.entry_type != "file" {
                continue;
            }
            if !self.files.is_empty() && !self.files.contains(&entry.name) {
                continue;
            }
            let Some(url) = entry.download_url else {
                continue;
            };
            let file_name = basename(&url);
            if matches!(file_name, "" | "." | "..") {
                return Err(DownloaderError::Transport {
                    url: url.clone(),
                    message: format!("listing entry {} has no usable file name", entry.name),
                });
            }
            let destination = folder.ontology_path(file_name);
            selected.push(RetrievalRequest::new(url, destination));
            matched.push(entry.name);
        }

        if let Some(missing) = self.files.iter().find(|name| !matched.contains(*name)) {
            return Err(DownloaderError::InvalidConfig(format!(
                "{missing} is not listed in {REPOSITORY_OWNER}/{REPOSITORY_NAME}/{REPOSITORY_PATH}"
            )));
        }
        Ok(selected)
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskReport, DownloaderError> {
        let url = Self::listing_url(ctx.endpoints);
        let body = ctx.transport.fetch(&url, None)?;
        let entries: Vec<RepositoryEntry> =
            serde_json::from_reader(body).map_err(|err| DownloaderError::Transport {
                url: url.clone(),
                message: format!("invalid repository listing: {err}"),
            })?;
        tracing::debug!(source = "github", entries = entries.len(), "fetched listing");

        let mut files = Vec::new();
        for request in self.select(entries, ctx.folder)? {
            files.push(ctx.retrieve(SourceKind::Github, &request)?);
        }
        Ok(TaskReport {
            source: SourceKind::Github,
            files,
        })
    }
}

fn basename(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}
