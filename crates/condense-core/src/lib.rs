//! Turn identification, zone-based removal, chain repair and band mapping

mod bands;
mod chain;
mod config;
mod fork;
mod removal;
mod truncate;
mod turns;
mod types;

pub use bands::{map_bands, turn_position};
pub use chain::{chain_is_intact, repair_chain};
pub use config::{ConfigError, RemovalConfig, ToolMode};
pub use fork::fork_session;
pub use removal::{remove_content, zone_boundary, RemovalOutcome, RemovalStats};
pub use truncate::{truncate_text, MAX_CHARS, MAX_LINES, TRUNCATION_MARKER};
pub use turns::{identify_turns, is_turn_start, turn_membership};
pub use types::{Band, Level, Turn};
