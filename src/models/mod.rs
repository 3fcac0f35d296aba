//! Data models for reconstructed Codex sessions.
//!
//! - [`Event`] - One typed unit of session activity (message, tool call,
//!   reasoning summary, malformed marker)
//! - [`Session`] - The result of a full parse: metadata, ordered events, warnings
//! - [`SessionInfo`] - The result of a fast scan: metadata and a preview line
//!
//! Models only derive `Serialize`; they are produced by the parsers, never read
//! back from disk.

pub mod event;
pub mod session;

pub use event::{Event, MalformedEvent, MessageEvent, MessageSource, ReasoningEvent, ToolEvent};
pub use session::{Session, SessionInfo, SessionMeta};
