//! Re-homing a transformed log under a new session id

use condense_transcript::Record;

/// Copy of `records` with every non-null `session_id` replaced
pub fn fork_session(records: &[Record], new_session_id: &str) -> Vec<Record> {
    records
        .iter()
        .map(|record| {
            let mut record = record.clone();
            if record.session_id.is_some() {
                record.session_id = Some(new_session_id.to_string());
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use condense_transcript::RecordKind;

    #[test]
    fn test_fork_rewrites_session_ids_only() {
        let records = vec![
            Record::user_text("u1", None, "q").with_session("old"),
            Record::new(RecordKind::Snapshot),
        ];
        let forked = fork_session(&records, "new");
        assert_eq!(forked[0].session_id.as_deref(), Some("new"));
        assert_eq!(forked[0].uuid.as_deref(), Some("u1"));
        assert_eq!(forked[1].session_id, None);
        assert_eq!(records[0].session_id.as_deref(), Some("old"));
    }
}
