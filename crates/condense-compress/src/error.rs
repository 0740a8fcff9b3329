//! Compression capability errors

use thiserror::Error;

/// Any failure of a single compression call. The batch engine treats every
/// variant the same way: retry while attempts remain, then give up.
#[derive(Error, Debug)]
pub enum CompressError {
    /// Credentials are required before any work starts
    #[error("ANTHROPIC_API_KEY is not set")]
    MissingCredentials,

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("response contained no text")]
    EmptyResponse,

    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error("{0}")]
    Other(String),
}
