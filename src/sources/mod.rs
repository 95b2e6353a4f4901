pub mod annotation;
pub mod bulk;
pub mod catalog;
pub mod repository;

use serde::Serialize;

use crate::config::{Endpoints, ResolvedConfig};
use crate::domain::{RetrievalRequest, SourceKind};
use crate::error::DownloaderError;
use crate::folder::DownloadFolder;
use crate::fs_util::save_stream;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::transport::Transport;

pub use annotation::AnnotationSource;
pub use bulk::BulkArchiveSource;
pub use catalog::{CatalogProtocol, CatalogSource};
pub use repository::{RepositoryEntry, RepositoryListing};

/// Everything a task may touch. Borrowed from the orchestrator for the
/// lifetime of one run.
#[derive(Clone, Copy)]
pub struct TaskContext<'a> {
    pub transport: &'a dyn Transport,
    pub folder: &'a DownloadFolder,
    pub endpoints: &'a Endpoints,
    pub sink: &'a dyn ProgressSink,
}

impl TaskContext<'_> {
    /// Fetches one request and writes it to its destination.
    pub fn retrieve(
        &self,
        source: SourceKind,
        request: &RetrievalRequest,
    ) -> Result<String, DownloaderError> {
        let mut body = self
            .transport
            .fetch(&request.url, request.authorization.as_deref())?;
        let written = save_stream(&request.destination, &mut body)?;
        let file = request.destination.display().to_string();
        tracing::debug!(source = %source, file = %file, bytes = written, "saved response body");
        self.sink.event(ProgressEvent::Downloaded {
            source,
            file: file.clone(),
        });
        Ok(file)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    pub source: SourceKind,
    pub files: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum SourceTask {
    Catalog(CatalogSource),
    Repository(RepositoryListing),
    BulkArchive(BulkArchiveSource),
    Annotation(AnnotationSource),
}

impl SourceTask {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceTask::Catalog(source) => source.kind(),
            SourceTask::Repository(_) => SourceKind::Github,
            SourceTask::BulkArchive(_) => SourceKind::Box,
            SourceTask::Annotation(_) => SourceKind::Ebi,
        }
    }

    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskReport, DownloaderError> {
        match self {
            SourceTask::Catalog(source) => source.run(ctx),
            SourceTask::Repository(source) => source.run(ctx),
            SourceTask::BulkArchive(source) => source.run(ctx),
            SourceTask::Annotation(source) => source.run(ctx),
        }
    }
}

/// Turns a resolved configuration into the list of enabled tasks.
pub fn plan_tasks(config: &ResolvedConfig) -> Result<Vec<SourceTask>, DownloaderError> {
    let mut tasks = Vec::new();
    if !config.purl.is_empty() {
        tasks.push(SourceTask::Catalog(CatalogSource::purl(config.purl.clone())));
    }
    if !config.bioportal.is_empty() {
        let api_key = config.api_key.clone().ok_or_else(|| {
            DownloaderError::MissingCredential("bioportal api-key is not set".to_string())
        })?;
        tasks.push(SourceTask::Catalog(CatalogSource::bioportal(
            config.bioportal.clone(),
            api_key,
        )));
    }
    if let Some(files) = &config.github {
        tasks.push(SourceTask::Repository(RepositoryListing::new(files.clone())));
    }
    if config.migration_data {
        tasks.push(SourceTask::BulkArchive(BulkArchiveSource));
    }
    if config.gpad {
        tasks.push(SourceTask::Annotation(AnnotationSource));
    }
    Ok(tasks)
}
