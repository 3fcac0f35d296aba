use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::cli::logging::init_tracing;
use crate::indexer::build_session_index;
use crate::models::{Event, MessageSource, Session, SessionInfo, SessionMeta};
use crate::parsers::fast_scan::DEFAULT_MAX_LINES;
use crate::parsers::{ScanOptions, TracingDiagnostics, parse_session_with};
use crate::utils::{format_timestamp, get_sessions_root, sanitize_line};

#[derive(Parser)]
#[command(name = "rollout-reader")]
#[command(version = "0.1.0")]
#[command(about = "Browse Codex CLI sessions from their rollout logs", long_about = None)]
pub struct Cli {
    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List sessions, newest first
    List {
        /// Sessions root [default: $CODEX_HOME/sessions]
        #[arg(long)]
        root: Option<PathBuf>,

        /// Maximum number of sessions to print (0 for all)
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Lines read per file when building the index
        #[arg(long, default_value_t = DEFAULT_MAX_LINES)]
        max_lines: usize,
    },
    /// Reconstruct a single rollout file
    Show {
        /// Path to a rollout-*.jsonl file
        file: PathBuf,

        /// Print the full session as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match cli.command {
        Some(Commands::List { root, limit, max_lines }) => {
            list_sessions(root, limit, max_lines)?;
        }
        Some(Commands::Show { file, json }) => {
            show_session(&file, json)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

fn list_sessions(root: Option<PathBuf>, limit: usize, max_lines: usize) -> Result<()> {
    let root = match root {
        Some(root) => root,
        None => get_sessions_root()?,
    };

    let index = build_session_index(&root, ScanOptions { max_lines }, &TracingDiagnostics);
    if index.is_empty() {
        println!("No sessions found under {}", root.display());
        return Ok(());
    }

    let limit = if limit == 0 { index.len() } else { limit };
    for session in index.iter().take(limit) {
        println!("{}", format_session_line(session));
    }

    Ok(())
}

/// One `list` row: `started | id | cwd | preview`, plus ` !N` when the scan warned
pub fn format_session_line(session: &SessionInfo) -> String {
    let started =
        session.meta.started_at.as_ref().map(format_timestamp).unwrap_or_else(|| "unknown".into());
    let label = session.meta.session_id.clone().unwrap_or_else(|| file_label(&session.path));
    let cwd = session.meta.cwd.as_deref().unwrap_or("unknown");
    let preview = session.preview.as_deref().unwrap_or("");

    let mut line = format!("{} | {} | {} | {}", started, label, cwd, preview);
    if session.warnings_count > 0 {
        line.push_str(&format!(" !{}", session.warnings_count));
    }

    sanitize_line(&line)
}

fn file_label(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

fn show_session(file: &Path, json: bool) -> Result<()> {
    let session = parse_session_with(file, &TracingDiagnostics)?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&session).context("Failed to serialize session")?;
        println!("{}", rendered);
        return Ok(());
    }

    print!("{}", render_summary(&session));
    Ok(())
}

/// Per-kind event totals shown by `show`
#[derive(Debug, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub user_messages: usize,
    pub assistant_messages: usize,
    pub other_messages: usize,
    pub echoed_messages: usize,
    pub tool_calls: usize,
    pub orphan_outputs: usize,
    pub reasoning: usize,
    pub malformed: usize,
}

impl EventCounts {
    pub fn from_events(events: &[Event]) -> Self {
        let mut counts = Self::default();
        for event in events {
            match event {
                Event::Message(message) => {
                    match message.role.as_str() {
                        "user" => counts.user_messages += 1,
                        "assistant" => counts.assistant_messages += 1,
                        _ => counts.other_messages += 1,
                    }
                    if message.source == MessageSource::EventMsg {
                        counts.echoed_messages += 1;
                    }
                }
                Event::Tool(tool) if tool.name.is_none() => counts.orphan_outputs += 1,
                Event::Tool(_) => counts.tool_calls += 1,
                Event::Reasoning(_) => counts.reasoning += 1,
                Event::Malformed(_) => counts.malformed += 1,
            }
        }
        counts
    }

    pub fn messages(&self) -> usize {
        self.user_messages + self.assistant_messages + self.other_messages
    }
}

/// Human-readable report for `show`
pub fn render_summary(session: &Session) -> String {
    let meta = &session.meta;
    let counts = EventCounts::from_events(&session.events);
    let mut out = String::new();

    let title =
        session.session_id().map(str::to_string).unwrap_or_else(|| file_label(&session.path));
    out.push_str(&format!("Codex session {}\n", sanitize_line(&title)));
    out.push_str("================================\n");
    out.push_str(&format!("File: {}\n", sanitize_line(&session.path.to_string_lossy())));
    push_meta(&mut out, meta);
    out.push('\n');

    let last_activity = session.events.iter().rev().find_map(Event::timestamp);
    if let Some(timestamp) = last_activity {
        out.push_str(&format!("Last activity: {}\n", format_timestamp(timestamp)));
    }
    out.push_str(&format!("Events: {}\n", session.events.len()));
    out.push_str(&format!(
        "  Messages: {} (user: {}, assistant: {}, other: {}, from event_msg: {})\n",
        counts.messages(),
        counts.user_messages,
        counts.assistant_messages,
        counts.other_messages,
        counts.echoed_messages
    ));
    out.push_str(&format!(
        "  Tool calls: {} (orphaned outputs: {})\n",
        counts.tool_calls, counts.orphan_outputs
    ));
    out.push_str(&format!("  Reasoning: {}\n", counts.reasoning));
    out.push_str(&format!("  Malformed: {}\n", counts.malformed));

    out.push_str(&format!("Warnings: {}\n", session.parse_warnings.len()));
    for warning in &session.parse_warnings {
        out.push_str(&format!("  - {}\n", sanitize_line(warning)));
    }

    out
}

fn push_meta(out: &mut String, meta: &SessionMeta) {
    let started = meta.started_at.as_ref().map(format_timestamp);
    let fields = [
        ("Started", started.as_deref()),
        ("CWD", meta.cwd.as_deref()),
        ("Repository", meta.repo_url.as_deref()),
        ("Branch", meta.branch.as_deref()),
        ("Commit", meta.commit_hash.as_deref()),
        ("CLI version", meta.cli_version.as_deref()),
        ("Originator", meta.originator.as_deref()),
        ("Ghost commit", meta.ghost_commit.as_deref()),
    ];

    for (label, value) in fields {
        let value = value.map(sanitize_line).unwrap_or_else(|| "unknown".into());
        out.push_str(&format!("{}: {}\n", label, value));
    }
}
