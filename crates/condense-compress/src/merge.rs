//! Writing compressed text back into records

use crate::task::{CompressionTask, TaskStatus};
use condense_transcript::{ContentBlock, MessageContent, Record};
use std::collections::HashMap;

/// Replace the textual portion of a record, keeping every other block in place.
///
/// String content is replaced outright. For block content, all text blocks
/// collapse into one new text block at the position of the first.
pub fn replace_text(record: &Record, text: &str) -> Record {
    match record.content() {
        None => record.clone(),
        Some(MessageContent::Text(_)) => {
            record.with_content(MessageContent::Text(text.to_string()))
        }
        Some(MessageContent::Blocks(blocks)) => {
            let Some(first) = blocks.iter().position(ContentBlock::is_text) else {
                return record.clone();
            };
            let merged = blocks
                .iter()
                .enumerate()
                .filter_map(|(i, block)| {
                    if i == first {
                        Some(ContentBlock::text(text))
                    } else if block.is_text() {
                        None
                    } else {
                        Some(block.clone())
                    }
                })
                .collect();
            record.with_content(MessageContent::Blocks(merged))
        }
    }
}

/// Apply successful tasks; failed and skipped ones leave their record alone
pub fn merge_results(records: &[Record], tasks: &[CompressionTask]) -> Vec<Record> {
    let replacements: HashMap<usize, &str> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Success)
        .filter_map(|t| t.result.as_deref().map(|r| (t.record_index, r)))
        .collect();

    records
        .iter()
        .enumerate()
        .map(|(idx, record)| match replacements.get(&idx) {
            Some(text) => replace_text(record, text),
            None => record.clone(),
        })
        .collect()
}
