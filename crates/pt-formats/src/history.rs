//! Append-only JSON history of completed sessions.
//!
//! The file holds one JSON array of session records. Appending reads the
//! whole array, pushes one record, and replaces the file through a
//! temporary sibling plus rename, so a reader sees either the old history
//! or the new one and never a torn write.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use pt_model::SessionRecord;
use thiserror::Error;

/// Error type for history storage.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("history file {} is not valid: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode history: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Handle to the session history file.
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every stored session, oldest first.
    ///
    /// A missing or blank file is an empty history.
    pub fn load(&self) -> Result<Vec<SessionRecord>, HistoryError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|source| HistoryError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Append one completed session. Returns the number of stored sessions.
    pub fn append(&self, record: &SessionRecord) -> Result<usize, HistoryError> {
        let mut sessions = self.load()?;
        sessions.push(record.clone());
        self.save(&sessions)?;
        tracing::info!(
            path = %self.path.display(),
            sessions = sessions.len(),
            "appended session to history"
        );
        Ok(sessions.len())
    }

    /// Replace the file contents atomically.
    fn save(&self, sessions: &[SessionRecord]) -> Result<(), HistoryError> {
        let json = serde_json::to_string_pretty(sessions)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let tmp_path = self.temp_path();
        let write_tmp = || -> io::Result<()> {
            let mut tmp_file = File::create(&tmp_path)?;
            tmp_file.write_all(json.as_bytes())?;
            tmp_file.write_all(b"\n")?;
            tmp_file.sync_all()
        };
        if let Err(e) = write_tmp() {
            let _ = fs::remove_file(&tmp_path);
            return Err(self.io_error(e));
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))
    }

    /// Hidden sibling used for the write-then-rename.
    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "history".to_string());
        self.path.with_file_name(format!(".{}.tmp", file_name))
    }

    fn io_error(&self, source: io::Error) -> HistoryError {
        HistoryError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("session_data.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn blank_file_is_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session_data.json");
        fs::write(&path, "  \n").unwrap();
        assert!(HistoryStore::new(path).load().unwrap().is_empty());
    }

    #[test]
    fn corrupt_file_reports_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session_data.json");
        fs::write(&path, "{ not json").unwrap();
        let store = HistoryStore::new(path);
        assert!(matches!(store.load(), Err(HistoryError::Parse { .. })));
        let record = SessionRecord {
            timestamp: "t".to_string(),
            results: Vec::new(),
        };
        assert!(store.append(&record).is_err());
        // The unreadable file is left alone rather than overwritten
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{ not json");
    }

    #[test]
    fn append_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("session_data.json"));
        let record = SessionRecord {
            timestamp: "t".to_string(),
            results: Vec::new(),
        };
        assert_eq!(store.append(&record).unwrap(), 1);
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["session_data.json".to_string()]);
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(dir.path().join("nested/deeper/history.json"));
        let record = SessionRecord {
            timestamp: "t".to_string(),
            results: Vec::new(),
        };
        store.append(&record).unwrap();
        assert_eq!(store.load().unwrap(), vec![record]);
    }
}
