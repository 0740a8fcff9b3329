//! Zone-based removal of tool and thinking content
//!
//! The zone is a leading share of turns. Tool invocations and their results
//! are removed (or truncated) in the first `tool_boundary` turns; thinking
//! is dropped in the first `thinking_boundary` turns. Records left with no
//! blocks are dropped and the parent chain is repaired.

use crate::chain::repair_chain;
use crate::config::{ConfigError, RemovalConfig, ToolMode};
use crate::truncate::{truncate_json, truncate_tool_output};
use crate::turns::{identify_turns, turn_membership};
use condense_transcript::{estimate_log_tokens, ContentBlock, MessageContent, Record, RecordKind};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RemovalStats {
    pub turns: usize,
    pub tool_boundary: usize,
    pub thinking_boundary: usize,
    pub tool_uses_removed: usize,
    pub tool_results_removed: usize,
    pub tool_blocks_truncated: usize,
    pub thinking_removed: usize,
    pub records_removed: usize,
    pub records_relinked: usize,
    pub tokens_before: usize,
    pub tokens_after: usize,
}

#[derive(Debug, Clone)]
pub struct RemovalOutcome {
    pub records: Vec<Record>,
    pub stats: RemovalStats,
}

/// Number of leading turns covered by `percent` (rounded, half away from zero)
pub fn zone_boundary(turn_count: usize, percent: u32) -> usize {
    let boundary = (turn_count as f64 * f64::from(percent) / 100.0).round() as usize;
    boundary.min(turn_count)
}

/// Apply a removal request, returning a new record collection
pub fn remove_content(
    records: &[Record],
    config: &RemovalConfig,
) -> Result<RemovalOutcome, ConfigError> {
    config.validate()?;

    let turns = identify_turns(records);
    let membership = turn_membership(&turns, records.len());
    let tool_boundary = zone_boundary(turns.len(), config.tool_removal);
    let thinking_boundary = zone_boundary(turns.len(), config.thinking_removal);
    let in_zone = |idx: usize, boundary: usize| membership[idx].is_some_and(|t| t < boundary);

    let mut stats = RemovalStats {
        turns: turns.len(),
        tool_boundary,
        thinking_boundary,
        tokens_before: estimate_log_tokens(records),
        ..Default::default()
    };

    // Results can trail their invocation by several records, so every
    // invocation id in the zone is collected before any result is touched.
    let zone_tool_ids: HashSet<&str> = records
        .iter()
        .enumerate()
        .filter(|(idx, r)| r.kind == RecordKind::Assistant && in_zone(*idx, tool_boundary))
        .flat_map(|(_, r)| r.blocks().unwrap_or_default())
        .filter_map(|block| match block {
            ContentBlock::ToolUse { id, .. } => Some(id.as_str()),
            _ => None,
        })
        .collect();

    let mut output = Vec::with_capacity(records.len());

    for (idx, record) in records.iter().enumerate() {
        let Some(blocks) = record.blocks() else {
            output.push(record.clone());
            continue;
        };
        let is_assistant = record.kind == RecordKind::Assistant;
        let strip_thinking = is_assistant && in_zone(idx, thinking_boundary);
        let tool_zone = is_assistant && in_zone(idx, tool_boundary);

        let mut changed = false;
        let mut kept = Vec::with_capacity(blocks.len());

        for block in blocks {
            match block {
                ContentBlock::Thinking { .. } | ContentBlock::RedactedThinking { .. }
                    if strip_thinking =>
                {
                    stats.thinking_removed += 1;
                    changed = true;
                }
                ContentBlock::ToolUse {
                    id,
                    name,
                    input,
                    extra,
                } if tool_zone => match config.tool_mode {
                    ToolMode::Remove => {
                        stats.tool_uses_removed += 1;
                        changed = true;
                    }
                    ToolMode::Truncate => match truncate_json(input) {
                        Some(input) => {
                            stats.tool_blocks_truncated += 1;
                            changed = true;
                            kept.push(ContentBlock::ToolUse {
                                id: id.clone(),
                                name: name.clone(),
                                input,
                                extra: extra.clone(),
                            });
                        }
                        None => kept.push(block.clone()),
                    },
                },
                ContentBlock::ToolResult {
                    tool_use_id,
                    content,
                    extra,
                } if zone_tool_ids.contains(tool_use_id.as_str()) => match config.tool_mode {
                    ToolMode::Remove => {
                        stats.tool_results_removed += 1;
                        changed = true;
                    }
                    ToolMode::Truncate => match truncate_tool_output(content) {
                        Some(content) => {
                            stats.tool_blocks_truncated += 1;
                            changed = true;
                            kept.push(ContentBlock::ToolResult {
                                tool_use_id: tool_use_id.clone(),
                                content,
                                extra: extra.clone(),
                            });
                        }
                        None => kept.push(block.clone()),
                    },
                },
                _ => kept.push(block.clone()),
            }
        }

        if !changed {
            output.push(record.clone());
        } else if kept.is_empty() {
            stats.records_removed += 1;
        } else {
            output.push(record.with_content(MessageContent::Blocks(kept)));
        }
    }

    let (output, relinked) = repair_chain(output);
    stats.records_relinked = relinked;
    stats.tokens_after = estimate_log_tokens(&output);

    info!(
        "removal: {} turns, tool zone {} ({:?}), thinking zone {}, {} records dropped, {} -> {} tokens",
        stats.turns,
        stats.tool_boundary,
        config.tool_mode,
        stats.thinking_boundary,
        stats.records_removed,
        stats.tokens_before,
        stats.tokens_after
    );

    Ok(RemovalOutcome {
        records: output,
        stats,
    })
}
