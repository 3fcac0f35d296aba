//! Session index building for the Codex rollout tree
//!
//! # Error Handling Strategy
//!
//! - **File-level failures**: A rollout file that cannot be read still produces
//!   a [`SessionInfo`](crate::models::SessionInfo) entry (with a warning count),
//!   so one bad file never hides the others.
//!
//! - **Tree-level failures**: A directory entry that cannot be visited is
//!   logged and skipped. A missing sessions root yields an empty index.
//!
//! - **Parallelism**: Files are scanned independently on the rayon thread pool;
//!   ordering is restored by sorting once all scans are done.

pub mod builder;
pub mod discovery;

pub use builder::{build_session_index, sort_sessions};
pub use discovery::find_rollout_files;
