use condense_compress::{BatchConfig, ModelConfig};
use condense_core::Band;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Optional settings from `~/.claude/condense.json`; CLI flags win
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub models: ModelConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub bands: Vec<Band>,
}

pub fn load_config(path: &Path) -> ConfigFile {
    if !path.exists() {
        return ConfigFile::default();
    }

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(err) => {
            warn!("could not read {}: {err}", path.display());
            return ConfigFile::default();
        }
    };

    match serde_json::from_str::<ConfigFile>(&content) {
        Ok(cf) => cf,
        Err(err) => {
            warn!("ignoring malformed {}: {err}", path.display());
            ConfigFile::default()
        }
    }
}
