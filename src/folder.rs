use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::error::DownloaderError;
use crate::progress::{ProgressEvent, ProgressSink};

pub const ONTOLOGY_DIR: &str = "ontology";
pub const GPAD_DIR: &str = "gpad";
pub const GPAD_FILE: &str = "dicty.gpad";
pub const ARCHIVE_FILE: &str = "migration-data.tar.bz2";

/// Output tree shared by all tasks. Each task writes into its own corner.
#[derive(Debug, Clone)]
pub struct DownloadFolder {
    root: Utf8PathBuf,
}

impl DownloadFolder {
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn ontology_dir(&self) -> Utf8PathBuf {
        self.root.join(ONTOLOGY_DIR)
    }

    pub fn ontology_path(&self, file_name: &str) -> Utf8PathBuf {
        self.ontology_dir().join(file_name)
    }

    pub fn gpad_dir(&self) -> Utf8PathBuf {
        self.root.join(GPAD_DIR)
    }

    pub fn gpad_path(&self) -> Utf8PathBuf {
        self.gpad_dir().join(GPAD_FILE)
    }

    pub fn archive_path(&self) -> Utf8PathBuf {
        self.root.join(ARCHIVE_FILE)
    }

    /// Creates the root and its fixed subfolders. Existing folders are
    /// left untouched, so this can run on every start.
    pub fn ensure(&self, sink: &dyn ProgressSink) -> Result<(), DownloaderError> {
        for dir in [self.root.clone(), self.ontology_dir(), self.gpad_dir()] {
            if dir.as_std_path().is_dir() {
                continue;
            }
            sink.event(ProgressEvent::FolderCreated {
                path: dir.to_string(),
            });
            fs::create_dir_all(dir.as_std_path()).map_err(|err| {
                DownloaderError::Filesystem(format!("create folder {dir}: {err}"))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::RecordingSink;

    #[test]
    fn layout_paths() {
        let folder = DownloadFolder::new("/data");
        assert_eq!(folder.ontology_path("go.obo"), "/data/ontology/go.obo");
        assert_eq!(folder.gpad_path(), "/data/gpad/dicty.gpad");
        assert_eq!(folder.archive_path(), "/data/migration-data.tar.bz2");
    }

    #[test]
    fn ensure_is_idempotent() {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().join("data")).unwrap();
        let folder = DownloadFolder::new(root);
        let sink = RecordingSink::new();

        folder.ensure(&sink).unwrap();
        std::fs::write(folder.ontology_path("keep.obo").as_std_path(), b"x").unwrap();
        folder.ensure(&sink).unwrap();

        assert!(folder.gpad_dir().as_std_path().is_dir());
        assert_eq!(
            std::fs::read(folder.ontology_path("keep.obo").as_std_path()).unwrap(),
            b"x"
        );
        let created = sink
            .events()
            .into_iter()
            .filter(|event| matches!(event, ProgressEvent::FolderCreated { .. }))
            .count();
        assert_eq!(created, 3);
    }
}
