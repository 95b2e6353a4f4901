use std::sync::Mutex;

use crate::domain::SourceKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    FolderReady,
    TasksRunning,
    Joined,
    SignalSent,
    SignalSkipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Phase(RunPhase),
    FolderCreated {
        path: String,
    },
    Downloaded {
        source: SourceKind,
        file: String,
    },
    Extracted {
        source: SourceKind,
        file: String,
    },
    EntrySkipped {
        path: String,
        entry_type: String,
    },
    TaskFailed {
        source: SourceKind,
        message: String,
    },
}

/// Receives everything a run wants to tell the outside world.
///
/// The orchestrator owns one and hands it to every task, so output can be
/// redirected or captured without touching global logger state.
pub trait ProgressSink: Send + Sync {
    fn event(&self, event: ProgressEvent);
}

/// Forwards events to `tracing` with structured fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn event(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase(phase) => tracing::debug!(?phase, "run phase"),
            ProgressEvent::FolderCreated { path } => {
                tracing::info!(folder = %path, "creating output folder")
            }
            ProgressEvent::Downloaded { source, file } => {
                tracing::info!(source = %source, file = %file, "downloaded file")
            }
            ProgressEvent::Extracted { source, file } => {
                tracing::info!(source = %source, file = %file, "extracted archive")
            }
            ProgressEvent::EntrySkipped { path, entry_type } => {
                tracing::info!(file = %path, entry_type = %entry_type, "no action taken for archive entry")
            }
            ProgressEvent::TaskFailed { source, message } => {
                tracing::error!(source = %source, error = %message, "download task failed")
            }
        }
    }
}

/// Keeps every event in memory, in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    pub fn phases(&self) -> Vec<RunPhase> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::Phase(phase) => Some(phase),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingSink {
    fn event(&self, event: ProgressEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}
