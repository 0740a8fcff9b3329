//! Turn identification
//!
//! A turn opens on a real human submission: a non-meta `user` record with
//! text and no tool result. Tool results arrive as `user` records too, but
//! they continue the current turn's round-trip rather than starting a new one.

use crate::types::Turn;
use condense_transcript::{Record, RecordKind};

/// Does this record open a new turn?
pub fn is_turn_start(record: &Record) -> bool {
    if record.kind != RecordKind::User || record.is_meta() {
        return false;
    }
    match record.content() {
        Some(content) => content.has_text() && !content.has_tool_result(),
        None => false,
    }
}

/// Split a record sequence into turns in a single left-to-right scan.
///
/// Records before the first turn start belong to no turn.
pub fn identify_turns(records: &[Record]) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();

    for (idx, record) in records.iter().enumerate() {
        if !is_turn_start(record) {
            continue;
        }
        if let Some(prev) = turns.last_mut() {
            prev.end = idx;
        }
        turns.push(Turn {
            index: turns.len(),
            start: idx,
            end: records.len(),
        });
    }

    turns
}

/// For every record, the index of the turn it belongs to
pub fn turn_membership(turns: &[Turn], record_count: usize) -> Vec<Option<usize>> {
    let mut membership = vec![None; record_count];
    for turn in turns {
        for slot in &mut membership[turn.range()] {
            *slot = Some(turn.index);
        }
    }
    membership
}
