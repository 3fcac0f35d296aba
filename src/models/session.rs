use std::path::PathBuf;

use serde::Serialize;

use crate::models::Event;
use crate::utils::{PathDate, Timestamp};

/// Identity and environment of a session, gathered from `session_meta`,
/// `turn_context` and `ghost_snapshot` records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionMeta {
    pub session_id: Option<String>,
    pub started_at: Option<Timestamp>,
    pub cwd: Option<String>,
    pub repo_url: Option<String>,
    pub branch: Option<String>,
    pub commit_hash: Option<String>,
    pub cli_version: Option<String>,
    pub originator: Option<String>,
    pub ghost_commit: Option<String>,
}

/// A fully reconstructed rollout file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub path: PathBuf,
    #[serde(flatten)]
    pub meta: SessionMeta,
    pub events: Vec<Event>,
    pub parse_warnings: Vec<String>,
}

impl Session {
    pub fn session_id(&self) -> Option<&str> {
        self.meta.session_id.as_deref()
    }

    pub fn started_at(&self) -> Option<&Timestamp> {
        self.meta.started_at.as_ref()
    }
}

/// One-line summary of a rollout file, produced by a bounded fast scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub path: PathBuf,
    pub date: Option<PathDate>,
    #[serde(flatten)]
    pub meta: SessionMeta,
    pub preview: Option<String>,
    pub warnings_count: usize,
}

impl SessionInfo {
    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year)
    }

    pub fn month(&self) -> Option<u32> {
        self.date.map(|d| d.month)
    }

    pub fn day(&self) -> Option<u32> {
        self.date.map(|d| d.day)
    }
}
