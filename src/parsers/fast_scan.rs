//! Bounded metadata and preview extraction for listing many sessions.
//!
//! Uses the same decoding and metadata rules as the full parser but reads at
//! most [`ScanOptions::max_lines`] lines, keeps no event list and only counts
//! warnings.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde_json::{Map, Value};

use crate::models::{SessionInfo, SessionMeta};
use crate::parsers::content::{
    PREVIEW_LIMIT, extract_event_user_message, extract_message_text, make_preview,
};
use crate::parsers::diagnostics::Diagnostics;
use crate::parsers::record::{Decoded, LossyLines, decode_line, unwrap_payload};
use crate::parsers::session::{apply_session_meta, backfill_cwd};
use crate::utils::parse_date_from_path;

/// Default number of lines read per file
pub const DEFAULT_MAX_LINES: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Lines read before the scan gives up
    pub max_lines: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self { max_lines: DEFAULT_MAX_LINES }
    }
}

/// What a fast scan recovered from the head of a file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastScan {
    pub meta: SessionMeta,
    /// First user message, shortened to a single line
    pub preview: Option<String>,
    pub warnings_count: usize,
}

/// Scan the head of a rollout file.
///
/// Never fails: an unreadable file counts as one warning. Only read failures
/// reach `diagnostics`; per-line problems are just counted.
pub fn scan_session(
    path: &Path,
    options: ScanOptions,
    diagnostics: &dyn Diagnostics,
) -> FastScan {
    match File::open(path) {
        Ok(file) => scan_reader(BufReader::new(file), path, options, diagnostics),
        Err(e) => {
            diagnostics.warning(path, &format!("failed to read file: {e}"));
            FastScan { warnings_count: 1, ..FastScan::default() }
        }
    }
}

/// [`scan_session`] over any line source
pub fn scan_reader<R: BufRead>(
    reader: R,
    path: &Path,
    options: ScanOptions,
    diagnostics: &dyn Diagnostics,
) -> FastScan {
    let mut scanner = Scanner::default();

    for (line_num, line) in LossyLines::new(reader).take(options.max_lines) {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                diagnostics.warning(path, &format!("failed to read file: {e}"));
                scanner.warnings_count += 1;
                break;
            }
        };
        scanner.feed_line(line_num, &line);
    }

    FastScan {
        meta: scanner.meta,
        preview: scanner.preview,
        warnings_count: scanner.warnings_count,
    }
}

/// Build the listing summary for one file, falling back to the path date
/// when no start time was found in the scanned lines
pub fn build_session_info(
    path: &Path,
    options: ScanOptions,
    diagnostics: &dyn Diagnostics,
) -> SessionInfo {
    let scan = scan_session(path, options, diagnostics);
    let date = parse_date_from_path(path);

    let mut meta = scan.meta;
    if meta.started_at.is_none() {
        meta.started_at = date.and_then(|d| d.start_of_day());
    }

    SessionInfo {
        path: path.to_path_buf(),
        date,
        meta,
        preview: scan.preview,
        warnings_count: scan.warnings_count,
    }
}

#[derive(Default)]
struct Scanner {
    meta: SessionMeta,
    saw_session_meta: bool,
    preview: Option<String>,
    seen_message_texts: HashSet<String>,
    warnings_count: usize,
}

impl Scanner {
    fn feed_line(&mut self, line_num: usize, line: &str) {
        let record = match decode_line(line, line_num) {
            Ok(Decoded::Record(record)) => record,
            Ok(Decoded::NotAnObject) => return,
            Err(_) => {
                self.warnings_count += 1;
                return;
            }
        };

        let payload = match record.payload {
            Some(Value::Object(payload)) => payload,
            _ => return,
        };

        match record.record_type.as_deref() {
            Some("session_meta") if !self.saw_session_meta => {
                self.saw_session_meta = true;
                apply_session_meta(&mut self.meta, &payload);
            }
            Some("turn_context") => backfill_cwd(&mut self.meta, &payload),
            Some("response_item") if self.preview.is_none() => self.on_response_item(payload),
            Some("event_msg") if self.preview.is_none() => self.on_event_msg(&payload),
            _ => {}
        }
    }

    fn on_response_item(&mut self, payload: Map<String, Value>) {
        let Value::Object(item) = unwrap_payload(Value::Object(payload)) else {
            return;
        };
        if item.get("type").and_then(Value::as_str) != Some("message")
            || item.get("role").and_then(Value::as_str) != Some("user")
        {
            return;
        }

        if let Some(text) = extract_message_text(&item).filter(|t| !t.is_empty()) {
            self.preview = Some(make_preview(&text, PREVIEW_LIMIT));
            self.seen_message_texts.insert(text);
        }
    }

    fn on_event_msg(&mut self, payload: &Map<String, Value>) {
        if payload.get("type").and_then(Value::as_str) != Some("user_message") {
            return;
        }

        if let Some(text) = extract_event_user_message(payload)
            .filter(|t| !t.is_empty() && !self.seen_message_texts.contains(t))
        {
            self.preview = Some(make_preview(&text, PREVIEW_LIMIT));
        }
    }
}
