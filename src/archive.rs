use std::fs::{DirBuilder, File};
use std::path::{Component, Path, PathBuf};

use bzip2::read::MultiBzDecoder;
use tar::{Archive, EntryType};

use crate::domain::MemberKind;
use crate::error::DownloaderError;
use crate::fs_util::save_stream;
use crate::progress::{ProgressEvent, ProgressSink};

/// Counts of what an extraction wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractStats {
    pub directories: usize,
    pub files: usize,
    pub skipped: usize,
}

/// Replays a `.tar.bz2` file onto `destination_root`.
///
/// Concatenated bzip2 streams, as written by parallel compressors, are read
/// as one tar stream.
///
/// Members are handled one at a time in archive order. Directories are
/// created non-recursively with their stored mode, so an archive must list
/// parents before children and must not contain directories that already
/// exist under the root. Anything that is neither a directory nor a regular
/// file is reported through `sink` and skipped.
pub fn extract_tar_bz2(
    source_file: &Path,
    destination_root: &Path,
    sink: &dyn ProgressSink,
) -> Result<ExtractStats, DownloaderError> {
    let file = File::open(source_file).map_err(|err| {
        DownloaderError::Filesystem(format!("open archive {}: {err}", source_file.display()))
    })?;
    let mut archive = Archive::new(MultiBzDecoder::new(file));
    let entries = archive
        .entries()
        .map_err(|err| DownloaderError::Archive(format!("open tar stream: {err}")))?;

    let mut stats = ExtractStats::default();
    for entry in entries {
        let mut entry =
            entry.map_err(|err| DownloaderError::Archive(format!("reading tar member: {err}")))?;
        let relative = entry
            .path()
            .map_err(|err| DownloaderError::Archive(format!("member path: {err}")))?
            .into_owned();
        let target = enclosed_path(destination_root, &relative)?;

        match member_kind(entry.header().entry_type()) {
            MemberKind::Directory => {
                let mode = entry
                    .header()
                    .mode()
                    .map_err(|err| DownloaderError::Archive(format!("member mode: {err}")))?;
                create_dir_with_mode(&target, mode)?;
                stats.directories += 1;
            }
            MemberKind::Regular => {
                save_stream(&target, &mut entry)?;
                stats.files += 1;
            }
            MemberKind::Other(entry_type) => {
                sink.event(ProgressEvent::EntrySkipped {
                    path: relative.display().to_string(),
                    entry_type,
                });
                stats.skipped += 1;
            }
        }
    }
    Ok(stats)
}

pub fn member_kind(entry_type: EntryType) -> MemberKind {
    match entry_type {
        EntryType::Directory => MemberKind::Directory,
        EntryType::Regular => MemberKind::Regular,
        other => MemberKind::Other(format!("{other:?}")),
    }
}

fn enclosed_path(root: &Path, relative: &Path) -> Result<PathBuf, DownloaderError> {
    let escapes = relative.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(DownloaderError::Archive(format!(
            "member path escapes destination: {}",
            relative.display()
        )));
    }
    Ok(root.join(relative))
}

fn create_dir_with_mode(path: &Path, mode: u32) -> Result<(), DownloaderError> {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    builder.create(path).map_err(|err| {
        DownloaderError::Filesystem(format!("creating directory {}: {err}", path.display()))
    })?;
    // The builder mode is filtered through the umask.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode & 0o7777))
            .map_err(|err| DownloaderError::Filesystem(err.to_string()))?;
    }
    #[cfg(not(unix))]
    let _ = mode;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_entry_types() {
        assert_eq!(member_kind(EntryType::Directory), MemberKind::Directory);
        assert_eq!(member_kind(EntryType::Regular), MemberKind::Regular);
        assert_eq!(
            member_kind(EntryType::Symlink),
            MemberKind::Other("Symlink".to_string())
        );
    }

    #[test]
    fn rejects_parent_components() {
        let err = enclosed_path(Path::new("/data"), Path::new("../etc/passwd")).unwrap_err();
        assert!(matches!(err, DownloaderError::Archive(_)));
    }

    #[test]
    fn keeps_nested_relative_paths() {
        let path = enclosed_path(Path::new("/data"), Path::new("foo/bar.txt")).unwrap();
        assert_eq!(path, Path::new("/data/foo/bar.txt"));
    }
}
