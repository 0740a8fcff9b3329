pub mod compress;
pub mod inspect;
pub mod remove;
pub mod version;

use condense_core::fork_session;
use condense_transcript::{LogStore, Paths, Record};
use std::path::Path;
use tracing::info;

/// Log store for `--dir`, or the current project's session folder
pub fn open_store(dir: Option<&Path>) -> anyhow::Result<LogStore> {
    let dir = match dir {
        Some(dir) => dir.to_path_buf(),
        None => Paths::new()?.project_dir()?,
    };
    Ok(LogStore::new(dir))
}

/// Save records as a brand-new session and return its id
pub fn write_fork(store: &LogStore, records: &[Record]) -> anyhow::Result<String> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let forked = fork_session(records, &session_id);
    let path = store.write_log(&session_id, &forked)?;
    info!("wrote {} records to {}", forked.len(), path.display());
    Ok(session_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_fork_creates_new_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(Some(dir.path())).unwrap();
        let records = vec![Record::user_text("u1", None, "hi").with_session("old")];

        let id = write_fork(&store, &records).unwrap();

        assert_ne!(id, "old");
        let forked = store.read_log(&id).unwrap();
        assert_eq!(forked[0].session_id.as_deref(), Some(id.as_str()));
        assert_eq!(forked[0].uuid.as_deref(), Some("u1"));
    }
}
