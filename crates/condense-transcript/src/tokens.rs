//! Token estimation utilities
//!
//! A deliberately simple heuristic: one token per four characters, rounded up.
//! Every size decision in the pipeline (thresholds, timeouts, stats) goes
//! through here so the numbers agree with each other.

use crate::types::{ContentBlock, MessageContent, Record};
use serde_json::Value;

const CHARS_PER_TOKEN: usize = 4;

/// Estimate token count from text (`ceil(chars / 4)`)
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Estimate the tokens one content block contributes. Images count zero.
pub fn estimate_block_tokens(block: &ContentBlock) -> usize {
    match block {
        ContentBlock::Text { text, .. } => estimate_tokens(text),
        ContentBlock::Thinking { thinking, .. } => estimate_tokens(thinking),
        ContentBlock::RedactedThinking { data, .. } => estimate_tokens(data),
        ContentBlock::ToolUse { name, input, .. } => {
            estimate_tokens(name) + estimate_tokens(&input.to_string())
        }
        ContentBlock::ToolResult { content, .. } => estimate_tokens(&tool_output_text(content)),
        ContentBlock::Image { .. } => 0,
    }
}

pub fn estimate_content_tokens(content: &MessageContent) -> usize {
    match content {
        MessageContent::Text(text) => estimate_tokens(text),
        MessageContent::Blocks(blocks) => blocks.iter().map(estimate_block_tokens).sum(),
    }
}

pub fn estimate_record_tokens(record: &Record) -> usize {
    record.content().map(estimate_content_tokens).unwrap_or(0)
}

pub fn estimate_log_tokens(records: &[Record]) -> usize {
    records.iter().map(estimate_record_tokens).sum()
}

/// Flatten a tool result's output to text, skipping nested images
pub fn tool_output_text(content: &Value) -> String {
    match content {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(|item| match item.get("type").and_then(Value::as_str) {
                Some("text") => item.get("text").and_then(Value::as_str).map(str::to_string),
                Some("image") => None,
                _ => Some(item.to_string()),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    }
}
