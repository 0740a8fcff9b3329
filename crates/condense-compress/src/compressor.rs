//! The text-compression capability and its Anthropic-backed implementation

use crate::error::CompressError;
use async_trait::async_trait;
use condense_core::Level;
use serde::{Deserialize, Serialize};
use tracing::debug;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Rewrites text to be shorter at a given intensity
#[async_trait]
pub trait Compressor: Send + Sync {
    async fn compress(
        &self,
        text: &str,
        level: Level,
        use_large_model: bool,
    ) -> Result<String, CompressError>;
}

/// Model selection for the Anthropic compressor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub small_model: String,
    pub large_model: String,
    pub max_tokens: u32,
    pub api_url: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            small_model: "claude-3-5-haiku-20241022".to_string(),
            large_model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 4096,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }
}

pub fn build_compression_prompt(text: &str, level: Level) -> String {
    let instruction = match level {
        Level::Standard => {
            "Condense this message from a coding session to about half its length. \
             Keep file paths, commands, identifiers, numbers and decisions exactly as written."
        }
        Level::Heavy => {
            "Reduce this message from a coding session to its essential points in a few \
             short sentences. Keep file paths and identifiers that matter for later work."
        }
    };
    format!(
        "{instruction} Reply with the condensed text only, no preamble.\n\n<message>\n{text}\n</message>"
    )
}

#[derive(Deserialize)]
struct ApiResponse {
    content: Vec<ApiBlock>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ApiBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

pub struct AnthropicCompressor {
    client: reqwest::Client,
    api_key: String,
    models: ModelConfig,
}

impl AnthropicCompressor {
    pub fn new(api_key: impl Into<String>, models: ModelConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            models,
        }
    }

    /// Build from `ANTHROPIC_API_KEY`; missing or blank is an error
    pub fn from_env(models: ModelConfig) -> Result<Self, CompressError> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(CompressError::MissingCredentials)?;
        Ok(Self::new(api_key, models))
    }

    fn model_for(&self, use_large_model: bool) -> &str {
        if use_large_model {
            &self.models.large_model
        } else {
            &self.models.small_model
        }
    }
}

#[async_trait]
impl Compressor for AnthropicCompressor {
    async fn compress(
        &self,
        text: &str,
        level: Level,
        use_large_model: bool,
    ) -> Result<String, CompressError> {
        let model = self.model_for(use_large_model);
        let prompt = build_compression_prompt(text, level);
        debug!("compressing {} chars with {}", text.len(), model);

        let response = self
            .client
            .post(&self.models.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "model": model,
                "max_tokens": self.models.max_tokens,
                "messages": [{"role": "user", "content": prompt}]
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CompressError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body: ApiResponse = response.json().await?;
        let text = body
            .content
            .into_iter()
            .filter_map(|block| match block {
                ApiBlock::Text { text } => Some(text),
                ApiBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        let text = text.trim();
        if text.is_empty() {
            return Err(CompressError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Offline compressor: keeps the leading sentences of the text
#[derive(Debug, Clone, Default)]
pub struct SentenceCompressor;

impl SentenceCompressor {
    /// Share of sentences kept per level, never fewer than one
    fn keep_count(total: usize, level: Level) -> usize {
        let divisor = match level {
            Level::Standard => 2,
            Level::Heavy => 4,
        };
        total.div_ceil(divisor).max(1)
    }
}

/// Split text into sentences, each keeping its own end punctuation.
///
/// A `.`, `!` or `?` only ends a sentence when followed by whitespace or the
/// end of the text, so paths (`src/main.rs`) and versions (`1.2.3`) stay whole.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().map_or(true, |(_, next)| next.is_whitespace());
        if at_boundary {
            let end = idx + ch.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence);
            }
            start = end;
        }
    }

    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// The first `max_sentences` sentences, verbatim, joined by single spaces
pub fn leading_sentences(content: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(content);
    sentences[..max_sentences.min(sentences.len())].join(" ")
}

#[async_trait]
impl Compressor for SentenceCompressor {
    async fn compress(
        &self,
        text: &str,
        level: Level,
        _use_large_model: bool,
    ) -> Result<String, CompressError> {
        let total = split_sentences(text).len();
        if total == 0 {
            return Err(CompressError::EmptyResponse);
        }
        let compressed = leading_sentences(text, Self::keep_count(total, level));
        if compressed.chars().count() >= text.trim().chars().count() {
            return Err(CompressError::Other(format!(
                "nothing to drop from {total} sentence(s)"
            )));
        }
        Ok(compressed)
    }
}
