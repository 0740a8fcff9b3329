//! Whole-file session log store

use crate::error::StoreError;
use crate::io::{atomic_write, parse_jsonl, to_jsonl};
use crate::types::Record;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads and writes named session logs (`<root>/<name>.jsonl`)
#[derive(Debug, Clone)]
pub struct LogStore {
    root: PathBuf,
}

impl LogStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        let name = name.strip_suffix(".jsonl").unwrap_or(name);
        self.root.join(format!("{name}.jsonl"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Load every record of a log
    pub fn read_log(&self, name: &str) -> Result<Vec<Record>, StoreError> {
        let path = self.path_for(name);
        if !path.is_file() {
            return Err(StoreError::NotFound(path));
        }
        let content = std::fs::read_to_string(&path)?;
        let records = parse_jsonl(&content)?;
        debug!("read {} records from {}", records.len(), path.display());
        Ok(records)
    }

    /// Replace (or create) a log with the given records in one write
    pub fn write_log(&self, name: &str, records: &[Record]) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name);
        let data = to_jsonl(records)?;
        atomic_write(&path, data.as_bytes())?;
        debug!("wrote {} records to {}", records.len(), path.display());
        Ok(path)
    }

    /// Write an auxiliary text file next to the logs
    pub fn write_text(&self, file_name: &str, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.root.join(file_name);
        atomic_write(&path, text.as_bytes())?;
        Ok(path)
    }
}
