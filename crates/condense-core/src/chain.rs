//! Back-reference repair after record deletion

use condense_transcript::Record;
use std::collections::HashSet;
use tracing::debug;

/// Point every dangling `parent_uuid` at the nearest preceding record that
/// still has a `uuid` (or null when there is none).
///
/// Returns the repaired records and how many were relinked. Afterwards every
/// non-null `parent_uuid` resolves to a `uuid` in the same collection.
pub fn repair_chain(records: Vec<Record>) -> (Vec<Record>, usize) {
    let retained: HashSet<String> = records.iter().filter_map(|r| r.uuid.clone()).collect();

    let mut last_uuid: Option<String> = None;
    let mut relinked = 0;
    let mut output = Vec::with_capacity(records.len());

    for mut record in records {
        let dangling = record
            .parent_uuid
            .as_ref()
            .is_some_and(|parent| !retained.contains(parent));
        if dangling {
            debug!(
                "relinking {:?}: parent {:?} -> {:?}",
                record.uuid, record.parent_uuid, last_uuid
            );
            record.parent_uuid = last_uuid.clone();
            relinked += 1;
        }
        if let Some(uuid) = &record.uuid {
            last_uuid = Some(uuid.clone());
        }
        output.push(record);
    }

    (output, relinked)
}

/// True when every non-null parent resolves within the collection
pub fn chain_is_intact(records: &[Record]) -> bool {
    let ids: HashSet<&str> = records.iter().filter_map(|r| r.uuid.as_deref()).collect();
    records
        .iter()
        .filter_map(|r| r.parent_uuid.as_deref())
        .all(|parent| ids.contains(parent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use condense_transcript::{ContentBlock, RecordKind};

    #[test]
    fn test_intact_chain_untouched() {
        let records = vec![
            Record::user_text("u1", None, "q"),
            Record::assistant("a1", Some("u1"), vec![ContentBlock::text("a")]),
        ];
        let (out, relinked) = repair_chain(records.clone());
        assert_eq!(out, records);
        assert_eq!(relinked, 0);
    }

    #[test]
    fn test_relinks_to_nearest_preceding_uuid() {
        // a1 (parent of r1) was deleted; a snapshot without uuid sits between
        let records = vec![
            Record::user_text("u1", None, "q"),
            Record::new(RecordKind::Snapshot),
            Record::user_blocks("r1", Some("a1"), vec![ContentBlock::text("x")]),
        ];
        let (out, relinked) = repair_chain(records);
        assert_eq!(relinked, 1);
        assert_eq!(out[2].parent_uuid.as_deref(), Some("u1"));
        assert!(chain_is_intact(&out));
    }

    #[test]
    fn test_relinks_to_null_when_nothing_precedes() {
        let records = vec![Record::user_text("u2", Some("gone"), "q")];
        let (out, _) = repair_chain(records);
        assert_eq!(out[0].parent_uuid, None);
    }

    #[test]
    fn test_consecutive_deletions() {
        let records = vec![
            Record::user_text("u1", None, "q"),
            Record::assistant("a3", Some("a2"), vec![ContentBlock::text("x")]),
            Record::assistant("a4", Some("a3"), vec![ContentBlock::text("y")]),
        ];
        let (out, relinked) = repair_chain(records);
        assert_eq!(relinked, 1);
        assert_eq!(out[1].parent_uuid.as_deref(), Some("u1"));
        assert_eq!(out[2].parent_uuid.as_deref(), Some("a3"));
    }
}
