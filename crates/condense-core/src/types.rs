//! Core types: turns and compression bands

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::str::FromStr;

/// A contiguous run of records from one human submission through the
/// assistant's final reply. `end` is exclusive and equals the next turn's
/// `start`; the last turn ends at the end of the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Turn {
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

impl Turn {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, record_index: usize) -> bool {
        self.range().contains(&record_index)
    }
}

/// Compression intensity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Standard,
    Heavy,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Standard => "standard",
            Level::Heavy => "heavy",
        }
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Level::Standard),
            "heavy" => Ok(Level::Heavy),
            _ => Err(ConfigError::InvalidBand(s.to_string())),
        }
    }
}

/// Percentage range of the conversation mapped to a compression level.
/// `start` is inclusive, `end` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBand")]
pub struct Band {
    pub start: f64,
    pub end: f64,
    pub level: Level,
}

#[derive(Deserialize)]
struct RawBand {
    start: f64,
    end: f64,
    level: Level,
}

impl TryFrom<RawBand> for Band {
    type Error = ConfigError;

    fn try_from(raw: RawBand) -> Result<Self, Self::Error> {
        Band::checked(raw.start, raw.end, raw.level).ok_or_else(|| {
            ConfigError::InvalidBand(format!("{}:{}:{}", raw.start, raw.end, raw.level.as_str()))
        })
    }
}

impl Band {
    pub fn new(start: f64, end: f64, level: Level) -> Self {
        Self { start, end, level }
    }

    /// Both bounds within 0..=100 and `start <= end`
    pub fn checked(start: f64, end: f64, level: Level) -> Option<Self> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        (in_range(start) && in_range(end) && start <= end).then(|| Band::new(start, end, level))
    }

    pub fn contains(&self, position: f64) -> bool {
        self.start <= position && position < self.end
    }
}

/// `START:END:LEVEL`, e.g. `0:50:standard`
impl FromStr for Band {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidBand(s.to_string());
        let parts: Vec<&str> = s.split(':').collect();
        let [start, end, level] = parts.as_slice() else {
            return Err(invalid());
        };
        let start: f64 = start.trim().parse().map_err(|_| invalid())?;
        let end: f64 = end.trim().parse().map_err(|_| invalid())?;
        let level: Level = level.trim().parse().map_err(|_| invalid())?;
        Band::checked(start, end, level).ok_or_else(invalid)
    }
}
