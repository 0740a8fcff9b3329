//! Compression tasks and the factory that derives them from banded turns

use condense_core::{Band, Level, Turn};
use condense_transcript::{estimate_tokens, Record, RecordKind, Role};
use serde::Serialize;

/// Inputs larger than this go to the large model
pub const LARGE_MODEL_THRESHOLD: usize = 1000;

/// Task lifecycle. Retries are internal to the batch engine: a failed
/// attempt with attempts left goes back to `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Success,
    Failed,
    Skipped,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Success => "success",
            TaskStatus::Failed => "failed",
            TaskStatus::Skipped => "skipped",
        }
    }
}

/// One unit of compression work targeting a single record's text
#[derive(Debug, Clone, Serialize)]
pub struct CompressionTask {
    pub record_index: usize,
    pub turn_index: usize,
    pub role: Role,
    pub original_text: String,
    pub level: Level,
    pub estimated_tokens: usize,
    pub use_large_model: bool,
    /// Zero-based index of the current (or last) attempt
    pub attempt: u32,
    pub initial_timeout_ms: u64,
    pub timeout_ms: u64,
    pub status: TaskStatus,
    pub result: Option<String>,
    pub error: Option<String>,
}

impl CompressionTask {
    pub fn new(
        record_index: usize,
        turn_index: usize,
        role: Role,
        text: String,
        level: Level,
        min_tokens: usize,
    ) -> Self {
        let estimated_tokens = estimate_tokens(&text);
        let timeout_ms = initial_timeout_ms(estimated_tokens);
        let status = if estimated_tokens < min_tokens {
            TaskStatus::Skipped
        } else {
            TaskStatus::Pending
        };

        Self {
            record_index,
            turn_index,
            role,
            original_text: text,
            level,
            estimated_tokens,
            use_large_model: estimated_tokens > LARGE_MODEL_THRESHOLD,
            attempt: 0,
            initial_timeout_ms: timeout_ms,
            timeout_ms,
            status,
            result: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status != TaskStatus::Pending
    }

    /// Calls actually made against the compressor
    pub fn attempts_made(&self) -> u32 {
        match self.status {
            TaskStatus::Skipped => 0,
            _ => self.attempt + 1,
        }
    }
}

/// Per-attempt timeout for a fresh task, tiered by size
pub fn initial_timeout_ms(estimated_tokens: usize) -> u64 {
    if estimated_tokens >= 4000 {
        90_000
    } else if estimated_tokens >= 1000 {
        30_000
    } else {
        20_000
    }
}

/// Timeout for retry number `attempt` (1-based): 1.5x, 2x, 2.5x, then 3x
/// the initial timeout
pub fn retry_timeout_ms(initial_timeout_ms: u64, attempt: u32) -> u64 {
    let factor = (1.0 + f64::from(attempt) * 0.5).min(3.0);
    (initial_timeout_ms as f64 * factor).round() as u64
}

/// Last assistant record in the turn carrying text: the final reply
fn final_reply(records: &[Record], turn: &Turn) -> Option<(usize, String)> {
    turn.range().rev().find_map(|idx| {
        let record = &records[idx];
        if record.kind != RecordKind::Assistant {
            return None;
        }
        record.text().map(|text| (idx, text))
    })
}

/// One task per role with text, for every turn that landed in a band
pub fn create_tasks(
    records: &[Record],
    turns: &[Turn],
    mapping: &[Option<Band>],
    min_tokens: usize,
) -> Vec<CompressionTask> {
    let mut tasks = Vec::new();

    for (turn, band) in turns.iter().zip(mapping) {
        let Some(band) = band else {
            continue;
        };

        if let Some(text) = records[turn.start].text() {
            if !text.trim().is_empty() {
                tasks.push(CompressionTask::new(
                    turn.start,
                    turn.index,
                    Role::User,
                    text,
                    band.level,
                    min_tokens,
                ));
            }
        }

        if let Some((idx, text)) = final_reply(records, turn) {
            if !text.trim().is_empty() {
                tasks.push(CompressionTask::new(
                    idx,
                    turn.index,
                    Role::Assistant,
                    text,
                    band.level,
                    min_tokens,
                ));
            }
        }
    }

    tasks
}
