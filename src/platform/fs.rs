// Rollbook - platform/fs.rs
//
// The "write named byte artifact" collaborator: persists export bytes
// produced by the core under a suggested file name.

use crate::util::error::ExportError;
use std::path::{Path, PathBuf};

/// Write `bytes` to `dir/file_name`, creating `dir` if needed.
///
/// The write is atomic: bytes go to a sibling temp file which is then
/// renamed over the destination, so an interrupted export never leaves a
/// truncated CSV behind. An existing file with the same name is replaced.
pub fn write_artifact(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let path = dir.join(file_name);
    let tmp = dir.join(format!(".{file_name}.tmp"));

    std::fs::write(&tmp, bytes).map_err(|e| ExportError::Io {
        path: tmp.clone(),
        source: e,
    })?;

    std::fs::rename(&tmp, &path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        ExportError::Io {
            path: path.clone(),
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Artifact written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_directory_and_replaces() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("nested").join("exports");

        let path = write_artifact(&dir, "Male_Students.csv", b"first").unwrap();
        assert_eq!(path, dir.join("Male_Students.csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"first");

        write_artifact(&dir, "Male_Students.csv", b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");

        // No temp file left behind.
        let leftovers: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}
