use serde::Serialize;

use crate::utils::Timestamp;

/// Which record shape a message arrived through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSource {
    /// `response_item` / `message`: the authoritative channel
    ResponseItem,
    /// `event_msg` / `user_message`: the lightweight echo channel
    EventMsg,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageEvent {
    pub role: String,
    pub text: String,
    pub source: MessageSource,
    pub timestamp: Option<Timestamp>,
    pub line_num: usize,
}

/// A tool invocation and whatever output was correlated to it.
///
/// Outputs sharing a call id are appended to `output` rather than replacing it.
/// An output with no known call id becomes a standalone `ToolEvent` with no
/// name or arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolEvent {
    pub name: Option<String>,
    pub arguments: Option<String>,
    pub call_id: Option<String>,
    pub output: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub line_num: usize,
    pub output_timestamp: Option<Timestamp>,
    pub output_line: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasoningEvent {
    pub summary: Vec<String>,
    pub timestamp: Option<Timestamp>,
    pub line_num: usize,
}

/// Marker left where a line could not be turned into anything useful
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MalformedEvent {
    pub description: String,
    pub timestamp: Option<Timestamp>,
    pub line_num: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Message(MessageEvent),
    Tool(ToolEvent),
    Reasoning(ReasoningEvent),
    Malformed(MalformedEvent),
}

impl Event {
    /// 1-based line the event was created from
    pub fn line_num(&self) -> usize {
        match self {
            Event::Message(e) => e.line_num,
            Event::Tool(e) => e.line_num,
            Event::Reasoning(e) => e.line_num,
            Event::Malformed(e) => e.line_num,
        }
    }

    pub fn timestamp(&self) -> Option<&Timestamp> {
        match self {
            Event::Message(e) => e.timestamp.as_ref(),
            Event::Tool(e) => e.timestamp.as_ref(),
            Event::Reasoning(e) => e.timestamp.as_ref(),
            Event::Malformed(e) => e.timestamp.as_ref(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::Message(_) => "message",
            Event::Tool(_) => "tool",
            Event::Reasoning(_) => "reasoning",
            Event::Malformed(_) => "malformed",
        }
    }
}
