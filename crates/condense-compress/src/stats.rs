//! Before/after accounting for a compression run

use crate::task::{CompressionTask, TaskStatus};
use condense_transcript::estimate_tokens;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompressionStats {
    pub tasks: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Estimated size of every task that was submitted
    pub original_tokens: usize,
    /// Re-estimated size of successful results
    pub compressed_tokens: usize,
    pub tokens_removed: i64,
    pub reduction_percent: i64,
}

pub fn calculate_stats(tasks: &[CompressionTask]) -> CompressionStats {
    let mut stats = CompressionStats {
        tasks: tasks.len(),
        ..Default::default()
    };

    for task in tasks {
        match task.status {
            TaskStatus::Success => stats.succeeded += 1,
            TaskStatus::Skipped => stats.skipped += 1,
            TaskStatus::Failed => stats.failed += 1,
            TaskStatus::Pending => {}
        }
        if task.status != TaskStatus::Skipped {
            stats.original_tokens += task.estimated_tokens;
        }
        if task.status == TaskStatus::Success {
            stats.compressed_tokens += task.result.as_deref().map(estimate_tokens).unwrap_or(0);
        }
    }

    stats.tokens_removed = stats.original_tokens as i64 - stats.compressed_tokens as i64;
    stats.reduction_percent = if stats.original_tokens == 0 {
        0
    } else {
        (100.0 * stats.tokens_removed as f64 / stats.original_tokens as f64).round() as i64
    };
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use condense_core::Level;
    use condense_transcript::Role;

    fn task(chars: usize, status: TaskStatus, result: Option<&str>) -> CompressionTask {
        let mut task =
            CompressionTask::new(0, 0, Role::User, "x".repeat(chars), Level::Standard, 30);
        task.status = status;
        task.result = result.map(str::to_string);
        task
    }

    #[test]
    fn test_empty_is_zero() {
        assert_eq!(calculate_stats(&[]), CompressionStats::default());
    }

    #[test]
    fn test_mixed_outcomes() {
        let tasks = vec![
            task(400, TaskStatus::Success, Some(&"y".repeat(100))),
            task(400, TaskStatus::Failed, None),
            task(40, TaskStatus::Skipped, None),
        ];
        let stats = calculate_stats(&tasks);
        assert_eq!(stats.tasks, 3);
        assert_eq!(stats.succeeded, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.original_tokens, 200);
        assert_eq!(stats.compressed_tokens, 25);
        assert_eq!(stats.tokens_removed, 175);
        assert_eq!(stats.reduction_percent, 88);
    }

    #[test]
    fn test_only_skipped_guards_division() {
        let stats = calculate_stats(&[task(8, TaskStatus::Skipped, None)]);
        assert_eq!(stats.original_tokens, 0);
        assert_eq!(stats.reduction_percent, 0);
    }
}
