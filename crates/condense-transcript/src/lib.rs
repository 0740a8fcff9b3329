//! Session transcript model, token estimation and JSONL log storage

mod error;
mod io;
mod paths;
mod store;
mod tokens;
mod types;

pub use error::StoreError;
pub use io::{atomic_write, parse_jsonl, to_jsonl};
pub use paths::{project_hash, Paths};
pub use store::LogStore;
pub use tokens::{
    estimate_block_tokens, estimate_content_tokens, estimate_log_tokens, estimate_record_tokens,
    estimate_tokens, tool_output_text,
};
pub use types::{ContentBlock, Message, MessageContent, Record, RecordKind, Role};
