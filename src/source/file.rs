//! Video samples read from a local JSON file.
//!
//! Accepts a bare array of videos or a saved search API response.

use crate::core::{parse_records, VideoRecord};
use crate::source::{SourceError, VideoSource};
use std::path::{Path, PathBuf};

/// A source that ignores the term and returns the file's contents.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VideoSource for FileSource {
    fn fetch(&self, _term: &str) -> Result<Vec<VideoRecord>, SourceError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            SourceError::Io(format!("Failed to read {:?}: {e}", self.path))
        })?;
        parse_records(&content).map_err(|e| SourceError::Serialization(e.to_string()))
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_reads_array_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"create_time": 1700000000, "play_count": 10, "author_user_id": "a"}}]"#
        )
        .unwrap();

        let records = FileSource::new(file.path()).fetch("anything").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].view_count, 10);
        assert_eq!(records[0].author(), Some("a"));
    }

    #[test]
    fn test_reads_api_envelope() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"code": 0, "data": {{"videos": [{{"play_count": 1}}, {{"play_count": 2}}]}}}}"#
        )
        .unwrap();

        let records = FileSource::new(file.path()).fetch("anything").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("missing.json"));
        assert!(matches!(source.fetch("x"), Err(SourceError::Io(_))));
    }

    #[test]
    fn test_invalid_json_is_serialization_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let source = FileSource::new(file.path());
        assert!(matches!(
            source.fetch("x"),
            Err(SourceError::Serialization(_))
        ));
    }
}
