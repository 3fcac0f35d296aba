//! Parsers for Codex rollout files (`rollout-*.jsonl`)
//!
//! # Error Handling Strategy
//!
//! Rollout files are append-only logs written by a process that may crash or be
//! upgraded mid-session, so the parsers treat damage as data rather than as
//! failure:
//!
//! - **Individual line failures**: A line that is not valid JSON becomes a
//!   `MalformedEvent` plus a `"line <n>: invalid json"` warning, and parsing
//!   continues with the next line.
//!
//! - **Structural mismatches**: A `response_item` whose payload is not a mapping,
//!   a message with no extractable text, or a tool output with an unknown call
//!   id is recorded as a warning; the first two also leave a `MalformedEvent`,
//!   the last becomes a standalone `ToolEvent`.
//!
//! - **Read failures**: An I/O error halfway through a file stops parsing of that
//!   file only. The session built so far is returned with a warning attached.
//!
//! - **Error propagation**: Opening the file is the only step that returns an
//!   error (`anyhow::Result`). Warnings are returned in the `Session` and may
//!   also be observed through a [`Diagnostics`] sink.

pub mod content;
pub mod diagnostics;
pub mod fast_scan;
pub mod record;
pub mod session;

pub use diagnostics::{Diagnostics, Silent, TracingDiagnostics};
pub use fast_scan::{FastScan, ScanOptions, build_session_info, scan_session};
pub use session::{SessionReconstructor, parse_session, parse_session_reader, parse_session_with};
