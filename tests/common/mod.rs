//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for creating test Codex home directories (`<home>/sessions/YYYY/MM/DD`)
pub struct CodexHomeBuilder {
    temp_dir: TempDir,
}

impl CodexHomeBuilder {
    /// Create a new builder with an empty `sessions` directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::create_dir(temp_dir.path().join("sessions")).expect("Failed to create sessions dir");
        Self { temp_dir }
    }

    /// Path used as `CODEX_HOME`
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Root of the rollout tree
    pub fn sessions_root(&self) -> PathBuf {
        self.temp_dir.path().join("sessions")
    }

    /// Add a rollout file under `sessions/<date_dir>/<file_name>`
    pub fn with_rollout(self, date_dir: &str, file_name: &str, rollout: &RolloutBuilder) -> Self {
        self.with_raw_file(date_dir, file_name, rollout.to_jsonl().as_bytes())
    }

    /// Add a file with arbitrary bytes under `sessions/<date_dir>/<file_name>`
    pub fn with_raw_file(self, date_dir: &str, file_name: &str, content: &[u8]) -> Self {
        let dir = self.sessions_root().join(date_dir);
        fs::create_dir_all(&dir).expect("Failed to create date dir");
        fs::write(dir.join(file_name), content).expect("Failed to write rollout file");
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for CodexHomeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the lines of a single rollout file
#[derive(Default)]
pub struct RolloutBuilder {
    lines: Vec<String>,
}

impl RolloutBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `session_meta` with id, start time and cwd
    pub fn session_meta(self, id: &str, timestamp: &str, cwd: &str) -> Self {
        self.record(
            "session_meta",
            Some(timestamp),
            json!({
                "id": id,
                "timestamp": timestamp,
                "cwd": cwd,
                "originator": "codex_cli_rs",
                "cli_version": "0.42.0",
                "git": {
                    "repository_url": "https://github.com/acme/widgets.git",
                    "branch": "main",
                    "commit_hash": "0123abcd"
                }
            }),
        )
    }

    /// `turn_context` carrying a cwd
    pub fn turn_context(self, cwd: &str) -> Self {
        self.record("turn_context", None, json!({ "cwd": cwd, "model": "gpt-5" }))
    }

    /// `response_item` message with `input_text`/`output_text` content blocks
    pub fn message(self, role: &str, text: &str) -> Self {
        let block_type = if role == "assistant" { "output_text" } else { "input_text" };
        self.response_item(json!({
            "type": "message",
            "role": role,
            "content": [{ "type": block_type, "text": text }]
        }))
    }

    /// `event_msg` echo of a user message
    pub fn event_user_message(self, text: &str) -> Self {
        self.record("event_msg", None, json!({ "type": "user_message", "message": text }))
    }

    pub fn function_call(self, name: &str, arguments: &str, call_id: &str) -> Self {
        self.response_item(json!({
            "type": "function_call",
            "name": name,
            "arguments": arguments,
            "call_id": call_id
        }))
    }

    pub fn function_call_output(self, call_id: &str, output: Value) -> Self {
        self.response_item(json!({
            "type": "function_call_output",
            "call_id": call_id,
            "output": output
        }))
    }

    /// `response_item` reasoning with `summary_text` blocks
    pub fn reasoning(self, summary: &[&str]) -> Self {
        let blocks: Vec<Value> =
            summary.iter().map(|text| json!({ "type": "summary_text", "text": text })).collect();
        self.response_item(json!({ "type": "reasoning", "summary": blocks }))
    }

    pub fn ghost_snapshot(self, commit: &str) -> Self {
        self.response_item(json!({ "type": "ghost_snapshot", "ghost_commit": commit }))
    }

    pub fn response_item(self, payload: Value) -> Self {
        self.record("response_item", None, payload)
    }

    /// Append a line verbatim (invalid JSON, blank lines, ...)
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn record(mut self, record_type: &str, timestamp: Option<&str>, payload: Value) -> Self {
        let mut record = json!({ "type": record_type, "payload": payload });
        if let Some(timestamp) = timestamp {
            record["timestamp"] = json!(timestamp);
        }
        self.lines.push(record.to_string());
        self
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Newline-terminated JSONL content
    pub fn to_jsonl(&self) -> String {
        let mut content = self.lines.join("\n");
        content.push('\n');
        content
    }
}
