use clap::{Args, Parser, Subcommand};
use condense_core::{Band, RemovalConfig, ToolMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "condense")]
#[command(version)]
#[command(about = "Shrink Claude Code session logs into forked sessions")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove or truncate tool and thinking content from early turns
    Remove {
        /// Session id (log file name without .jsonl)
        session: String,

        #[command(flatten)]
        removal: RemovalArgs,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Compress the message text of banded turns
    Compress(CompressArgs),

    /// Show turns, record kinds and token totals of a session
    Inspect {
        session: String,

        /// Directory holding the session logs (defaults to the current project's)
        #[arg(long)]
        dir: Option<PathBuf>,
    },

    /// Print version information
    Version,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RemovalArgs {
    /// Percentage of leading turns whose tool blocks are affected
    #[arg(long = "tools", value_name = "PCT", default_value_t = 0)]
    pub tool_removal: u32,

    /// remove or truncate
    #[arg(long, default_value = "remove")]
    pub tool_mode: ToolMode,

    /// Percentage of leading turns whose thinking is dropped
    #[arg(long = "thinking", value_name = "PCT", default_value_t = 0)]
    pub thinking_removal: u32,
}

impl RemovalArgs {
    pub fn config(&self) -> RemovalConfig {
        RemovalConfig::new(self.tool_removal, self.tool_mode, self.thinking_removal)
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Directory holding the session logs (defaults to the current project's)
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Report what would change without writing a new session (compress
    /// only plans its tasks and never calls the compressor)
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompressArgs {
    pub session: String,

    /// START:END:LEVEL, repeatable (e.g. 0:50:heavy --band 50:80:standard)
    #[arg(long = "band", value_name = "START:END:LEVEL")]
    pub bands: Vec<Band>,

    /// Tasks in flight at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Attempts per task, first try included
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Skip messages estimated below this many tokens
    #[arg(long)]
    pub min_tokens: Option<usize>,

    /// Write a before/after report next to the new session
    #[arg(long)]
    pub debug_log: bool,

    /// Compress locally by keeping leading sentences, no API calls
    #[arg(long)]
    pub offline: bool,

    #[command(flatten)]
    pub removal: RemovalArgs,

    #[command(flatten)]
    pub target: TargetArgs,
}
