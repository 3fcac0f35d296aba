//! Index builder for the Codex rollout tree.
//!
//! Scans every rollout file with the bounded fast scan and returns one
//! [`SessionInfo`] per file, newest first.

use std::cmp::Ordering;
use std::path::Path;

use rayon::prelude::*;

use crate::indexer::discovery::find_rollout_files;
use crate::models::SessionInfo;
use crate::parsers::{Diagnostics, ScanOptions, build_session_info};

/// Build the session index for a sessions root
///
/// Every `rollout-*.jsonl` file under `sessions_root` is scanned in parallel
/// (each file independently, at most `options.max_lines` lines). The result is
/// sorted newest first, with sessions whose start time is unknown last.
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use rollout_reader::{ScanOptions, build_session_index};
/// use rollout_reader::parsers::Silent;
///
/// let root = PathBuf::from("/Users/alice/.codex/sessions");
/// let index = build_session_index(&root, ScanOptions::default(), &Silent);
/// println!("Indexed {} sessions", index.len());
/// ```
pub fn build_session_index(
    sessions_root: &Path,
    options: ScanOptions,
    diagnostics: &dyn Diagnostics,
) -> Vec<SessionInfo> {
    let files = find_rollout_files(sessions_root);

    let sessions: Vec<SessionInfo> =
        files.par_iter().map(|path| build_session_info(path, options, diagnostics)).collect();

    let with_warnings = sessions.iter().filter(|s| s.warnings_count > 0).count();
    tracing::info!(
        sessions = sessions.len(),
        with_warnings,
        "Indexed {} sessions under {}",
        sessions.len(),
        sessions_root.display()
    );

    sort_sessions(sessions)
}

/// Sort newest first; undated sessions go last in their original order
pub fn sort_sessions(mut sessions: Vec<SessionInfo>) -> Vec<SessionInfo> {
    sessions.sort_by(|a, b| match (&a.meta.started_at, &b.meta.started_at) {
        (Some(a), Some(b)) => b.to_utc().cmp(&a.to_utc()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    sessions
}
