//! Configuration for content removal

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: u32 },

    #[error("invalid tool mode '{0}' (expected remove or truncate)")]
    InvalidToolMode(String),

    #[error("invalid band '{0}' (expected START:END:LEVEL, e.g. 0:50:standard)")]
    InvalidBand(String),
}

/// What happens to tool blocks inside the removal zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    /// Drop invocations and their results
    #[default]
    Remove,
    /// Keep the blocks, shorten their payloads
    Truncate,
}

impl FromStr for ToolMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "remove" => Ok(ToolMode::Remove),
            "truncate" => Ok(ToolMode::Truncate),
            _ => Err(ConfigError::InvalidToolMode(s.to_string())),
        }
    }
}

/// Removal request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// Percentage of leading turns whose tool blocks are affected
    #[serde(default)]
    pub tool_removal: u32,

    #[serde(default)]
    pub tool_mode: ToolMode,

    /// Percentage of leading turns whose thinking blocks are dropped
    #[serde(default)]
    pub thinking_removal: u32,
}

impl RemovalConfig {
    pub fn new(tool_removal: u32, tool_mode: ToolMode, thinking_removal: u32) -> Self {
        Self {
            tool_removal,
            tool_mode,
            thinking_removal,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tool_removal > 100 {
            return Err(ConfigError::PercentOutOfRange {
                field: "tool_removal",
                value: self.tool_removal,
            });
        }
        if self.thinking_removal > 100 {
            return Err(ConfigError::PercentOutOfRange {
                field: "thinking_removal",
                value: self.thinking_removal,
            });
        }
        Ok(())
    }

    /// True when the request would not touch anything
    pub fn is_noop(&self) -> bool {
        self.tool_removal == 0 && self.thinking_removal == 0
    }
}
