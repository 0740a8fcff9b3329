//! JSONL parsing and atomic file operations

use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parse JSONL text, one record per non-blank line. Any bad line fails the
/// whole parse with its 1-based line number.
pub fn parse_jsonl<T: for<'de> Deserialize<'de>>(content: &str) -> Result<Vec<T>, StoreError> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|source| StoreError::Malformed {
            line: idx + 1,
            source,
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Serialize records to JSONL text with a trailing newline
pub fn to_jsonl<T: Serialize>(records: &[T]) -> Result<String, StoreError> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Record, RecordKind};

    #[test]
    fn test_parse_skips_blank_lines() {
        let text = "{\"type\":\"summary\",\"summary\":\"s\"}\n\n   \n{\"type\":\"system\",\"uuid\":\"x\"}\n";
        let records: Vec<Record> = parse_jsonl(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, RecordKind::Summary);
        assert_eq!(records[1].kind, RecordKind::System);
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let text = "{\"type\":\"summary\"}\nnot json\n";
        let err = parse_jsonl::<Record>(text).unwrap_err();
        match err {
            StoreError::Malformed { line, .. } => assert_eq!(line, 2),
            other => panic!("expected malformed, got {other}"),
        }
    }

    #[test]
    fn test_jsonl_roundtrip_is_stable() {
        let text = "{\"parentUuid\":null,\"sessionId\":\"s\",\"type\":\"user\",\"message\":{\"role\":\"user\",\"content\":\"hi\"},\"uuid\":\"u1\",\"cwd\":\"/tmp\"}\n";
        let records: Vec<Record> = parse_jsonl(text).unwrap();
        assert_eq!(to_jsonl(&records).unwrap(), text);
    }

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::tempdir().unwrap();
        let test_file = dir.path().join("nested").join("out.jsonl");

        atomic_write(&test_file, b"Hello, world!").unwrap();

        let read_data = std::fs::read(&test_file).unwrap();
        assert_eq!(b"Hello, world!", read_data.as_slice());
        assert!(!test_file.with_extension("tmp").exists());
    }
}
