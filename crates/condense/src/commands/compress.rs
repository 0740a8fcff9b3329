use crate::cli::CompressArgs;
use crate::config::{load_config, ConfigFile};
use condense_compress::{
    create_tasks, transform, write_report, AnthropicCompressor, BatchConfig, CompressionRequest,
    CompressionStats, Compressor, SentenceCompressor, TaskStatus,
};
use condense_core::{identify_turns, map_bands, remove_content, Band, RemovalConfig};
use condense_transcript::{Paths, Record};

pub fn run(args: &CompressArgs) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let file = load_config(&paths.config_file());
    execute(args, file)
}

fn execute(args: &CompressArgs, file: ConfigFile) -> anyhow::Result<()> {
    let bands = if args.bands.is_empty() {
        file.bands
    } else {
        args.bands.clone()
    };
    let removal = args.removal.config();
    if bands.is_empty() && removal.is_noop() {
        anyhow::bail!("nothing to do: pass --band START:END:LEVEL or set bands in condense.json");
    }

    let batch = BatchConfig {
        concurrency: args.concurrency.unwrap_or(file.batch.concurrency),
        max_attempts: args.max_attempts.unwrap_or(file.batch.max_attempts),
        min_tokens: args.min_tokens.unwrap_or(file.batch.min_tokens),
    };

    if args.target.dry_run {
        let store = super::open_store(args.target.dir.as_deref())?;
        let records = store.read_log(&args.session)?;
        for line in plan(&records, &removal, &bands, batch.min_tokens)? {
            println!("dry run: {line}");
        }
        return Ok(());
    }

    // Credentials are checked before any log is read
    let compressor: Box<dyn Compressor> = if args.offline {
        Box::new(SentenceCompressor)
    } else {
        Box::new(AnthropicCompressor::from_env(file.models)?)
    };

    let request = CompressionRequest {
        bands,
        debug_log: args.debug_log,
    };

    let store = super::open_store(args.target.dir.as_deref())?;
    let records = store.read_log(&args.session)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let outcome = runtime.block_on(transform(
        &records,
        &removal,
        &request,
        compressor.as_ref(),
        &batch,
    ))?;

    let removal_line = outcome.removal.as_ref().map(super::remove::summary);
    let compression_line = summary(&outcome.compression.stats);

    let new_session = super::write_fork(&store, &outcome.records)?;
    if request.debug_log {
        write_report(
            &store,
            &new_session,
            &records,
            &outcome.records,
            &outcome.compression.tasks,
            &outcome.compression.stats,
        );
    }

    println!("{new_session}");
    if let Some(line) = removal_line {
        println!("{line}");
    }
    println!("{compression_line}");
    Ok(())
}

/// Removal for real, compression only as far as task creation
fn plan(
    records: &[Record],
    removal: &RemovalConfig,
    bands: &[Band],
    min_tokens: usize,
) -> anyhow::Result<Vec<String>> {
    let mut lines = Vec::new();

    let records = if removal.is_noop() {
        records.to_vec()
    } else {
        let outcome = remove_content(records, removal)?;
        lines.push(super::remove::summary(&outcome.stats));
        outcome.records
    };

    let turns = identify_turns(&records);
    let tasks = create_tasks(&records, &turns, &map_bands(&turns, bands), min_tokens);
    let pending: Vec<_> = tasks
        .iter()
        .filter(|t| t.status == TaskStatus::Pending)
        .collect();
    lines.push(format!(
        "{} tasks planned ({} to compress, {} below {} tokens); ~{} tokens to send",
        tasks.len(),
        pending.len(),
        tasks.len() - pending.len(),
        min_tokens,
        pending.iter().map(|t| t.estimated_tokens).sum::<usize>()
    ));

    Ok(lines)
}

fn summary(stats: &CompressionStats) -> String {
    format!(
        "{} tasks ({} compressed, {} failed, {} skipped); {} -> {} tokens, {}% reduction",
        stats.tasks,
        stats.succeeded,
        stats.failed,
        stats.skipped,
        stats.original_tokens,
        stats.compressed_tokens,
        stats.reduction_percent
    )
}
