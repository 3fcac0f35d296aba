//! Rollout Reader - Reconstruct Codex CLI sessions from their rollout logs
//!
//! Codex records every session as an append-only JSONL file under
//! `~/.codex/sessions/YYYY/MM/DD/rollout-*.jsonl`. This library turns those
//! loosely structured event streams into typed sessions ready for rendering:
//!
//! - Decoding each line, tolerating invalid JSON and invalid UTF-8
//! - Merging tool calls with their outputs by call id
//! - De-duplicating user messages recorded through two channels
//! - Collecting session metadata (id, cwd, git repository, CLI version)
//! - Fast, bounded scans for listing many sessions at once
//!
//! # Example
//!
//! ```no_run
//! use rollout_reader::parse_session;
//! use std::path::Path;
//!
//! let session = parse_session(Path::new("rollout-2024-03-07T10-00-00-abc.jsonl"))?;
//! for event in &session.events {
//!     println!("line {}: {}", event.line_num(), event.kind());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod indexer;
pub mod models;
pub mod parsers;
pub mod utils;

// Re-export commonly used types
pub use indexer::build_session_index;
pub use models::{Event, Session, SessionInfo};
pub use parsers::{ScanOptions, build_session_info, parse_session};
pub use utils::{Timestamp, format_timestamp};
