use std::thread;

use serde::Serialize;

use crate::config::ResolvedConfig;
use crate::coordination::{CoordinationStore, signal_complete};
use crate::domain::SourceKind;
use crate::error::DownloaderError;
use crate::folder::DownloadFolder;
use crate::progress::{ProgressEvent, ProgressSink, RunPhase};
use crate::sources::{SourceTask, TaskContext, TaskReport, plan_tasks};
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalOutcome {
    Sent,
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub download_folder: String,
    pub tasks: Vec<TaskReport>,
    pub signal: SignalOutcome,
    pub finished_at: String,
}

pub type TaskOutcome = (SourceKind, Result<TaskReport, DownloaderError>);

/// Runs every enabled source concurrently, waits for all of them and then
/// records completion in the coordination store.
#[derive(Clone)]
pub struct App<T: Transport> {
    transport: T,
}

impl<T: Transport> App<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// A failing task does not stop its siblings: all tasks are joined
    /// first, every failure is reported to `sink`, and the first one is
    /// returned. The completion key is only written when nothing failed.
    pub fn run(
        &self,
        config: &ResolvedConfig,
        coordination: Option<&dyn CoordinationStore>,
        sink: &dyn ProgressSink,
    ) -> Result<RunSummary, DownloaderError> {
        let tasks = plan_tasks(config)?;

        let folder = DownloadFolder::new(config.download_folder.clone());
        folder.ensure(sink)?;
        sink.event(ProgressEvent::Phase(RunPhase::FolderReady));

        let ctx = TaskContext {
            transport: &self.transport,
            folder: &folder,
            endpoints: &config.endpoints,
            sink,
        };
        sink.event(ProgressEvent::Phase(RunPhase::TasksRunning));
        let outcomes = run_concurrently(&tasks, &ctx);
        sink.event(ProgressEvent::Phase(RunPhase::Joined));

        let mut reports = Vec::with_capacity(outcomes.len());
        let mut first_failure = None;
        for (kind, outcome) in outcomes {
            match outcome {
                Ok(report) => reports.push(report),
                Err(error) => {
                    sink.event(ProgressEvent::TaskFailed {
                        source: kind,
                        message: error.to_string(),
                    });
                    if first_failure.is_none() {
                        first_failure = Some(DownloaderError::SourceFailed {
                            kind,
                            error: Box::new(error),
                        });
                    }
                }
            }
        }
        if let Some(error) = first_failure {
            return Err(error);
        }

        let signal = match coordination {
            Some(store) => {
                signal_complete(store)?;
                sink.event(ProgressEvent::Phase(RunPhase::SignalSent));
                SignalOutcome::Sent
            }
            None => {
                sink.event(ProgressEvent::Phase(RunPhase::SignalSkipped));
                SignalOutcome::Skipped
            }
        };

        Ok(RunSummary {
            download_folder: folder.root().to_string(),
            tasks: reports,
            signal,
            finished_at: iso_timestamp(),
        })
    }
}

/// One scoped thread per task. Results come back in task order.
fn run_concurrently(tasks: &[SourceTask], ctx: &TaskContext<'_>) -> Vec<TaskOutcome> {
    thread::scope(|scope| {
        let handles = tasks
            .iter()
            .map(|task| {
                let kind = task.kind();
                let handle = scope.spawn(move || {
                    let _span = tracing::info_span!("task", source = %kind).entered();
                    task.run(ctx)
                });
                (kind, handle)
            })
            .collect::<Vec<_>>();

        handles
            .into_iter()
            .map(|(kind, handle)| {
                let outcome = handle
                    .join()
                    .unwrap_or_else(|_| Err(DownloaderError::TaskPanicked(kind)));
                (kind, outcome)
            })
            .collect()
    })
}

fn iso_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
