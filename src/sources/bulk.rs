use crate::archive::extract_tar_bz2;
use crate::domain::{RetrievalRequest, SourceKind};
use crate::error::DownloaderError;
use crate::progress::ProgressEvent;

use super::{TaskContext, TaskReport};

/// The migration data blob: downloaded next to the output tree, then
/// unpacked into the download folder root.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulkArchiveSource;

impl BulkArchiveSource {
    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskReport, DownloaderError> {
        let archive_path = ctx.folder.archive_path();
        let request = RetrievalRequest::new(&ctx.endpoints.migration_archive, archive_path.clone());
        let file = ctx.retrieve(SourceKind::Box, &request)?;

        let stats = extract_tar_bz2(
            archive_path.as_std_path(),
            ctx.folder.root().as_std_path(),
            ctx.sink,
        )?;
        tracing::debug!(
            source = "box",
            directories = stats.directories,
            files = stats.files,
            skipped = stats.skipped,
            "archive members replayed"
        );
        ctx.sink.event(ProgressEvent::Extracted {
            source: SourceKind::Box,
            file: file.clone(),
        });

        Ok(TaskReport {
            source: SourceKind::Box,
            files: vec![file],
        })
    }
}
