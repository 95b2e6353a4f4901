use crate::domain::{RetrievalRequest, SourceKind};
use crate::error::DownloaderError;

use super::{TaskContext, TaskReport};

/// dictyBase GPAD annotations from QuickGO.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationSource;

impl AnnotationSource {
    pub fn run(&self, ctx: &TaskContext<'_>) -> Result<TaskReport, DownloaderError> {
        let request = RetrievalRequest::new(&ctx.endpoints.gpad, ctx.folder.gpad_path());
        let file = ctx.retrieve(SourceKind::Ebi, &request)?;
        Ok(TaskReport {
            source: SourceKind::Ebi,
            files: vec![file],
        })
    }
}
