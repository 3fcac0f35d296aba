use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::models::{
    Event, MalformedEvent, MessageEvent, MessageSource, ReasoningEvent, Session, SessionMeta,
    ToolEvent,
};
use crate::parsers::content::{
    OUTPUT_SEPARATOR, coerce_text, extract_agent_reasoning, extract_event_user_message,
    extract_message_text, extract_reasoning_summary, format_jsonish,
};
use crate::parsers::diagnostics::{Diagnostics, Silent};
use crate::parsers::record::{Decoded, LossyLines, Record, decode_line, unwrap_payload};
use crate::utils::{Timestamp, parse_date_from_path, parse_timestamp};

/// Warning recorded when a file has no `session_meta` record
pub const SESSION_META_MISSING: &str = "session_meta missing";

/// Parse a rollout file into a [`Session`]
///
/// Only failing to open the file is an error. Everything after that (bad
/// lines, unexpected shapes, a read error halfway through) is reported in
/// [`Session::parse_warnings`] and the session built so far is returned.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use rollout_reader::parse_session;
///
/// let session = parse_session(Path::new("rollout-2024-03-07T10-00-00-abc.jsonl"))?;
/// println!("{} events, {} warnings", session.events.len(), session.parse_warnings.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn parse_session(path: &Path) -> Result<Session> {
    parse_session_with(path, &Silent)
}

/// [`parse_session`] reporting each warning to `diagnostics` as it is recorded
pub fn parse_session_with(path: &Path, diagnostics: &dyn Diagnostics) -> Result<Session> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open session file: {}", path.display()))?;
    Ok(parse_session_reader(BufReader::new(file), path, diagnostics))
}

/// Reconstruct a session from any line source; `path` is used for the date
/// fallback and for diagnostics
pub fn parse_session_reader<R: BufRead>(
    reader: R,
    path: &Path,
    diagnostics: &dyn Diagnostics,
) -> Session {
    let mut reconstructor = SessionReconstructor::new(path, diagnostics);

    for (line_num, line) in LossyLines::new(reader) {
        match line {
            Ok(line) => reconstructor.feed_line(line_num, &line),
            Err(e) => {
                reconstructor.warn(format!("failed to read file: {e}"));
                break;
            }
        }
    }

    reconstructor.finish()
}

/// Populate metadata from a `session_meta` payload.
///
/// `cwd` keeps an earlier `turn_context` value when the payload has none.
pub(crate) fn apply_session_meta(meta: &mut SessionMeta, payload: &Map<String, Value>) {
    meta.session_id = coerce_text(payload.get("id"));
    meta.started_at = payload.get("timestamp").and_then(Value::as_str).and_then(parse_timestamp);
    meta.cwd = coerce_text(payload.get("cwd")).or(meta.cwd.take());
    meta.originator = coerce_text(payload.get("originator"));
    meta.cli_version = coerce_text(payload.get("cli_version"));

    if let Some(Value::Object(git)) = payload.get("git") {
        meta.repo_url = coerce_text(git.get("repository_url"));
        meta.branch = coerce_text(git.get("branch"));
        meta.commit_hash =
            coerce_text(git.get("commit_hash")).or_else(|| coerce_text(git.get("commit")));
    }
}

/// Fill `cwd` from a `turn_context` payload if nothing set it yet
pub(crate) fn backfill_cwd(meta: &mut SessionMeta, payload: &Map<String, Value>) {
    if meta.cwd.is_none() {
        meta.cwd = coerce_text(payload.get("cwd"));
    }
}

/// Incremental event reconstruction for a single rollout file.
///
/// Feed lines in file order, then call [`finish`](Self::finish). Tool calls
/// are indexed by call id (as positions in the event list) so that a later
/// `function_call_output` can be merged into the call in place.
pub struct SessionReconstructor<'a> {
    path: &'a Path,
    diagnostics: &'a dyn Diagnostics,
    meta: SessionMeta,
    saw_session_meta: bool,
    events: Vec<Event>,
    warnings: Vec<String>,
    tool_calls: HashMap<String, usize>,
    seen_message_texts: HashSet<String>,
}

impl<'a> SessionReconstructor<'a> {
    pub fn new(path: &'a Path, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            path,
            diagnostics,
            meta: SessionMeta::default(),
            saw_session_meta: false,
            events: Vec::new(),
            warnings: Vec::new(),
            tool_calls: HashMap::new(),
            seen_message_texts: HashSet::new(),
        }
    }

    /// Process one raw line (1-based `line_num`)
    pub fn feed_line(&mut self, line_num: usize, line: &str) {
        match decode_line(line, line_num) {
            Ok(Decoded::Record(record)) => self.dispatch(record, line_num),
            Ok(Decoded::NotAnObject) => {}
            Err(err) => {
                self.warn(err.warning());
                self.push_malformed(format!("Invalid JSON at line {line_num}"), None, line_num);
            }
        }
    }

    /// Run the post-pass and hand over the finished session
    pub fn finish(mut self) -> Session {
        if !self.saw_session_meta {
            self.warn(SESSION_META_MISSING.to_string());
        }
        if self.meta.started_at.is_none() {
            self.meta.started_at =
                parse_date_from_path(self.path).and_then(|date| date.start_of_day());
        }

        Session {
            path: self.path.to_path_buf(),
            meta: self.meta,
            events: self.events,
            parse_warnings: self.warnings,
        }
    }

    fn warn(&mut self, message: String) {
        self.diagnostics.warning(self.path, &message);
        self.warnings.push(message);
    }

    fn dispatch(&mut self, record: Record, line_num: usize) {
        let Record { record_type, timestamp, payload } = record;

        match (record_type.as_deref(), payload) {
            (Some("session_meta"), Some(Value::Object(payload))) => {
                // The first session_meta is authoritative
                if !self.saw_session_meta {
                    self.saw_session_meta = true;
                    apply_session_meta(&mut self.meta, &payload);
                }
            }
            (Some("turn_context"), Some(Value::Object(payload))) => {
                backfill_cwd(&mut self.meta, &payload);
            }
            (Some("response_item"), payload) => {
                self.on_response_item(payload, timestamp, line_num);
            }
            (Some("event_msg"), Some(Value::Object(payload))) => {
                self.on_event_msg(&payload, timestamp, line_num);
            }
            _ => {}
        }
    }

    fn on_response_item(
        &mut self,
        payload: Option<Value>,
        timestamp: Option<Timestamp>,
        line_num: usize,
    ) {
        // Unwrapped once by the decoder; older files need a second pass
        let item = match payload {
            Some(payload @ Value::Object(_)) => match unwrap_payload(payload) {
                Value::Object(item) => item,
                _ => return self.malformed_response_item(timestamp, line_num),
            },
            _ => return self.malformed_response_item(timestamp, line_num),
        };

        match item.get("type").and_then(Value::as_str) {
            Some("message") => self.on_message(&item, timestamp, line_num),
            Some("function_call") => self.on_function_call(&item, timestamp, line_num),
            Some("function_call_output") => {
                self.on_function_call_output(&item, timestamp, line_num)
            }
            Some("reasoning") => {
                let summary = extract_reasoning_summary(&item);
                if !summary.is_empty() {
                    self.events.push(Event::Reasoning(ReasoningEvent {
                        summary,
                        timestamp,
                        line_num,
                    }));
                }
            }
            Some("ghost_snapshot") => {
                // The latest snapshot wins, even when it carries no commit
                self.meta.ghost_commit = coerce_text(item.get("ghost_commit"));
            }
            _ => {}
        }
    }

    fn malformed_response_item(&mut self, timestamp: Option<Timestamp>, line_num: usize) {
        self.warn(format!("line {line_num}: response_item payload not a dict"));
        self.push_malformed(
            format!("Skipped malformed response_item at line {line_num}"),
            timestamp,
            line_num,
        );
    }

    fn on_message(
        &mut self,
        item: &Map<String, Value>,
        timestamp: Option<Timestamp>,
        line_num: usize,
    ) {
        let role = coerce_text(item.get("role"))
            .filter(|role| !role.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        let Some(text) = extract_message_text(item).filter(|text| !text.is_empty()) else {
            self.warn(format!("line {line_num}: message without text"));
            self.push_malformed(
                format!("Skipped empty message at line {line_num}"),
                timestamp,
                line_num,
            );
            return;
        };

        if role == "user" {
            self.seen_message_texts.insert(text.clone());
        }
        self.events.push(Event::Message(MessageEvent {
            role,
            text,
            source: MessageSource::ResponseItem,
            timestamp,
            line_num,
        }));
    }

    fn on_function_call(
        &mut self,
        item: &Map<String, Value>,
        timestamp: Option<Timestamp>,
        line_num: usize,
    ) {
        let call_id = coerce_text(item.get("call_id"));

        if let Some(id) = call_id.as_ref().filter(|id| !id.is_empty()) {
            self.tool_calls.insert(id.clone(), self.events.len());
        }
        self.events.push(Event::Tool(ToolEvent {
            name: coerce_text(item.get("name")),
            arguments: format_jsonish(item.get("arguments")),
            call_id,
            output: None,
            timestamp,
            line_num,
            output_timestamp: None,
            output_line: None,
        }));
    }

    fn on_function_call_output(
        &mut self,
        item: &Map<String, Value>,
        timestamp: Option<Timestamp>,
        line_num: usize,
    ) {
        let call_id = coerce_text(item.get("call_id"));
        let output = format_jsonish(item.get("output"));

        let pending = call_id.as_ref().and_then(|id| self.tool_calls.get(id)).copied();
        if let Some(Event::Tool(tool)) = pending.and_then(|index| self.events.get_mut(index)) {
            match tool.output.as_mut() {
                Some(existing) if !existing.is_empty() => {
                    existing.push_str(OUTPUT_SEPARATOR);
                    existing.push_str(output.as_deref().unwrap_or_default());
                }
                _ => tool.output = output,
            }
            tool.output_timestamp = timestamp;
            tool.output_line = Some(line_num);
            return;
        }

        self.warn(format!("line {line_num}: tool output without call"));
        self.events.push(Event::Tool(ToolEvent {
            name: None,
            arguments: None,
            call_id,
            output,
            timestamp,
            line_num,
            output_timestamp: None,
            output_line: None,
        }));
    }

    fn on_event_msg(
        &mut self,
        payload: &Map<String, Value>,
        timestamp: Option<Timestamp>,
        line_num: usize,
    ) {
        match payload.get("type").and_then(Value::as_str) {
            Some("user_message") => {
                let Some(text) = extract_event_user_message(payload) else {
                    return;
                };
                // Already emitted through the response_item channel
                if text.is_empty() || self.seen_message_texts.contains(&text) {
                    return;
                }
                self.events.push(Event::Message(MessageEvent {
                    role: "user".to_string(),
                    text,
                    source: MessageSource::EventMsg,
                    timestamp,
                    line_num,
                }));
            }
            Some("agent_reasoning") => {
                let summary = extract_agent_reasoning(payload);
                if !summary.is_empty() {
                    self.events.push(Event::Reasoning(ReasoningEvent {
                        summary,
                        timestamp,
                        line_num,
                    }));
                }
            }
            _ => {}
        }
    }

    fn push_malformed(
        &mut self,
        description: String,
        timestamp: Option<Timestamp>,
        line_num: usize,
    ) {
        self.events.push(Event::Malformed(MalformedEvent { description, timestamp, line_num }));
    }
}
