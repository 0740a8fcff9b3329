//! End-to-end transformation: removal, then band-driven compression

use crate::batch::{BatchConfig, BatchEngine};
use crate::compressor::Compressor;
use crate::merge::merge_results;
use crate::stats::{calculate_stats, CompressionStats};
use crate::task::{create_tasks, CompressionTask};
use condense_core::{
    identify_turns, map_bands, remove_content, Band, ConfigError, RemovalConfig, RemovalStats,
};
use condense_transcript::Record;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which parts of the conversation to compress, and how hard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompressionRequest {
    #[serde(default)]
    pub bands: Vec<Band>,
    #[serde(default)]
    pub debug_log: bool,
}

#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub records: Vec<Record>,
    /// Terminal tasks sorted by record index
    pub tasks: Vec<CompressionTask>,
    pub stats: CompressionStats,
}

/// Compress the banded turns of a log. The record count never changes;
/// records whose task failed or was skipped come back untouched.
pub async fn compress_records(
    records: &[Record],
    request: &CompressionRequest,
    compressor: &dyn Compressor,
    config: &BatchConfig,
) -> CompressionOutcome {
    if request.bands.is_empty() {
        return CompressionOutcome {
            records: records.to_vec(),
            tasks: Vec::new(),
            stats: CompressionStats::default(),
        };
    }

    let turns = identify_turns(records);
    let mapping = map_bands(&turns, &request.bands);
    let tasks = create_tasks(records, &turns, &mapping, config.min_tokens);
    info!(
        "{} turns, {} in bands, {} tasks",
        turns.len(),
        mapping.iter().filter(|b| b.is_some()).count(),
        tasks.len()
    );

    let tasks = BatchEngine::new(compressor, config.clone()).run(tasks).await;
    let merged = merge_results(records, &tasks);
    let stats = calculate_stats(&tasks);

    info!(
        "compression: {} ok, {} failed, {} skipped; {} -> {} tokens ({}%)",
        stats.succeeded,
        stats.failed,
        stats.skipped,
        stats.original_tokens,
        stats.compressed_tokens,
        stats.reduction_percent
    );

    CompressionOutcome {
        records: merged,
        tasks,
        stats,
    }
}

#[derive(Debug, Clone)]
pub struct TransformOutcome {
    pub records: Vec<Record>,
    pub removal: Option<RemovalStats>,
    pub compression: CompressionOutcome,
}

/// Removal (when it would change anything) followed by compression
pub async fn transform(
    records: &[Record],
    removal: &RemovalConfig,
    request: &CompressionRequest,
    compressor: &dyn Compressor,
    config: &BatchConfig,
) -> Result<TransformOutcome, ConfigError> {
    let (records, removal_stats) = if removal.is_noop() {
        (records.to_vec(), None)
    } else {
        let outcome = remove_content(records, removal)?;
        (outcome.records, Some(outcome.stats))
    };

    let compression = compress_records(&records, request, compressor, config).await;

    Ok(TransformOutcome {
        records: compression.records.clone(),
        removal: removal_stats,
        compression,
    })
}
