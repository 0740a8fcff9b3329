//! Human-readable before/after report of a compression run

use crate::stats::CompressionStats;
use crate::task::{CompressionTask, TaskStatus};
use chrono::Utc;
use condense_transcript::{LogStore, Record};
use std::path::PathBuf;
use tracing::{info, warn};

pub fn render_report(
    original: &[Record],
    transformed: &[Record],
    tasks: &[CompressionTask],
    stats: &CompressionStats,
) -> String {
    let mut sections = Vec::with_capacity(tasks.len() + 1);

    sections.push(format!(
        "# Compression report\n\n\
         Generated: {}\n\
         Records: {} -> {}\n\
         Tasks: {} ({} succeeded, {} failed, {} skipped)\n\
         Tokens: {} -> {} ({} removed, {}%)",
        Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        original.len(),
        transformed.len(),
        stats.tasks,
        stats.succeeded,
        stats.failed,
        stats.skipped,
        stats.original_tokens,
        stats.compressed_tokens,
        stats.tokens_removed,
        stats.reduction_percent
    ));

    for task in tasks {
        sections.push(format!(
            "## Record {} ({}, turn {})\n\
             level: {} | status: {} | attempts: {} | ~{} tokens\n\n\
             ### Before\n{}\n\n\
             ### After\n{}",
            task.record_index,
            task.role.as_str(),
            task.turn_index,
            task.level.as_str(),
            task.status.as_str(),
            task.attempts_made(),
            task.estimated_tokens,
            task.original_text,
            after_text(task, transformed)
        ));
    }

    sections.join("\n\n") + "\n"
}

fn after_text(task: &CompressionTask, transformed: &[Record]) -> String {
    match task.status {
        TaskStatus::Success => transformed
            .get(task.record_index)
            .and_then(Record::text)
            .or_else(|| task.result.clone())
            .unwrap_or_default(),
        TaskStatus::Failed => format!(
            "(unchanged, failed: {})",
            task.error.as_deref().unwrap_or("unknown error")
        ),
        TaskStatus::Skipped | TaskStatus::Pending => {
            format!("(unchanged, {})", task.status.as_str())
        }
    }
}

/// Write the report next to the logs. Failure is logged, never propagated.
pub fn write_report(
    store: &LogStore,
    log_name: &str,
    original: &[Record],
    transformed: &[Record],
    tasks: &[CompressionTask],
    stats: &CompressionStats,
) -> Option<PathBuf> {
    let report = render_report(original, transformed, tasks, stats);
    match store.write_text(&format!("{log_name}.condense.md"), &report) {
        Ok(path) => {
            info!("debug report written to {}", path.display());
            Some(path)
        }
        Err(err) => {
            warn!("could not write debug report: {err}");
            None
        }
    }
}
