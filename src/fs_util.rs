use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::DownloaderError;

/// Writes `reader` into `destination`, truncating any existing file.
///
/// The parent directory must already exist; nothing above the file is
/// created here. Returns the number of bytes written.
pub fn save_stream(destination: &Path, reader: &mut dyn Read) -> Result<u64, DownloaderError> {
    let mut file = File::create(destination).map_err(|err| {
        DownloaderError::Filesystem(format!("create {}: {err}", destination.display()))
    })?;
    let written = io::copy(reader, &mut file).map_err(|err| {
        DownloaderError::Filesystem(format!("write {}: {err}", destination.display()))
    })?;
    file.flush()
        .map_err(|err| DownloaderError::Filesystem(err.to_string()))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_stream_truncates_existing_file() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("out.obo");
        std::fs::write(&path, b"previous content that is longer").unwrap();

        let written = save_stream(&path, &mut &b"new"[..]).unwrap();

        assert_eq!(written, 3);
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }

    #[test]
    fn save_stream_requires_parent() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("missing").join("out.obo");

        let err = save_stream(&path, &mut &b"data"[..]).unwrap_err();

        assert!(matches!(err, DownloaderError::Filesystem(_)));
        assert!(!temp.path().join("missing").exists());
    }
}
