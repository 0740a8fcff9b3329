//! Batched execution of compression tasks
//!
//! Pending tasks run in sequential batches of `concurrency`. Every member of a
//! batch races the compressor against its own timeout, and the next batch
//! starts only once the whole batch has settled. Failures go to the back of
//! the queue with a longer timeout until `max_attempts` is spent.

use crate::compressor::Compressor;
use crate::error::CompressError;
use crate::task::{retry_timeout_ms, CompressionTask, TaskStatus};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Batch engine and task factory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Tasks in flight at once
    pub concurrency: usize,
    /// Total attempts per task, first try included
    pub max_attempts: u32,
    /// Tasks estimated below this are skipped
    pub min_tokens: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            max_attempts: 3,
            min_tokens: 30,
        }
    }
}

/// Progress callback: `(terminal tasks, tasks submitted)`
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

pub struct BatchEngine<'a> {
    compressor: &'a dyn Compressor,
    config: BatchConfig,
    progress: Option<Box<ProgressFn>>,
}

impl<'a> BatchEngine<'a> {
    pub fn new(compressor: &'a dyn Compressor, config: BatchConfig) -> Self {
        Self {
            compressor,
            config,
            progress: None,
        }
    }

    pub fn with_progress(
        mut self,
        progress: impl Fn(usize, usize) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Run every pending task to a terminal state. Returns all tasks,
    /// including ones skipped up front, sorted by target record index.
    pub async fn run(&self, tasks: Vec<CompressionTask>) -> Vec<CompressionTask> {
        let concurrency = self.config.concurrency.max(1);
        let max_attempts = self.config.max_attempts.max(1);

        let (pending, mut done): (Vec<_>, Vec<_>) =
            tasks.into_iter().partition(|t| t.status == TaskStatus::Pending);
        let mut pending: VecDeque<CompressionTask> = pending.into();
        let submitted = pending.len();
        let mut finished = 0;
        let mut batch_no = 0;

        info!(
            "compressing {} tasks ({} skipped), concurrency {}, max attempts {}",
            submitted,
            done.len(),
            concurrency,
            max_attempts
        );

        while !pending.is_empty() {
            batch_no += 1;
            let take = concurrency.min(pending.len());
            let batch: Vec<CompressionTask> = pending.drain(..take).collect();

            let outcomes = join_all(batch.iter().map(|task| self.attempt(task))).await;

            for (mut task, outcome) in batch.into_iter().zip(outcomes) {
                match outcome {
                    Ok(text) => {
                        task.status = TaskStatus::Success;
                        task.result = Some(text);
                        task.error = None;
                        finished += 1;
                        done.push(task);
                    }
                    Err(err) if task.attempt + 1 < max_attempts => {
                        task.attempt += 1;
                        task.timeout_ms = retry_timeout_ms(task.initial_timeout_ms, task.attempt);
                        warn!(
                            "record {}: attempt {} failed, retrying with {}ms timeout: {}",
                            task.record_index, task.attempt, task.timeout_ms, err
                        );
                        task.error = Some(err.to_string());
                        pending.push_back(task);
                    }
                    Err(err) => {
                        warn!(
                            "record {}: giving up after {} attempts: {}",
                            task.record_index,
                            task.attempt + 1,
                            err
                        );
                        task.status = TaskStatus::Failed;
                        task.error = Some(err.to_string());
                        finished += 1;
                        done.push(task);
                    }
                }
            }

            info!(
                "batch {}: {}/{} tasks finished, {} queued",
                batch_no,
                finished,
                submitted,
                pending.len()
            );
            if let Some(progress) = &self.progress {
                progress(finished, submitted);
            }
        }

        done.sort_by_key(|t| t.record_index);
        done
    }

    async fn attempt(&self, task: &CompressionTask) -> Result<String, CompressError> {
        debug!(
            "record {} ({}): attempt {}, {} tokens, {}ms timeout",
            task.record_index,
            task.role.as_str(),
            task.attempt + 1,
            task.estimated_tokens,
            task.timeout_ms
        );

        let call = self
            .compressor
            .compress(&task.original_text, task.level, task.use_large_model);

        match tokio::time::timeout(Duration::from_millis(task.timeout_ms), call).await {
            Ok(Ok(text)) if text.trim().is_empty() => Err(CompressError::EmptyResponse),
            Ok(result) => result,
            Err(_) => Err(CompressError::Timeout(task.timeout_ms)),
        }
    }
}
