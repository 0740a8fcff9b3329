//! Band-driven conversation compression through an external capability

mod batch;
mod compressor;
mod error;
mod merge;
mod pipeline;
mod report;
mod stats;
mod task;

pub use batch::{BatchConfig, BatchEngine, ProgressFn};
pub use compressor::{
    build_compression_prompt, leading_sentences, split_sentences, AnthropicCompressor,
    Compressor, ModelConfig, SentenceCompressor,
};
pub use error::CompressError;
pub use merge::{merge_results, replace_text};
pub use pipeline::{
    compress_records, transform, CompressionOutcome, CompressionRequest, TransformOutcome,
};
pub use report::{render_report, write_report};
pub use stats::{calculate_stats, CompressionStats};
pub use task::{
    create_tasks, initial_timeout_ms, retry_timeout_ms, CompressionTask, TaskStatus,
    LARGE_MODEL_THRESHOLD,
};
