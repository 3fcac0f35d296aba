//! Line-level decoding of rollout files.
//!
//! Every line is decoded on its own: a bad line never affects its neighbours.

use std::fmt;
use std::io::{self, BufRead};

use serde_json::Value;

use crate::utils::{Timestamp, parse_timestamp};

/// One JSON object line, with its payload already unwrapped once
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub record_type: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub payload: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Record(Record),
    /// Valid JSON that is not an object (array, string, number...)
    NotAnObject,
}

/// A line that is not valid JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub line_num: usize,
    pub message: String,
}

impl DecodeError {
    /// Warning text recorded against the session
    pub fn warning(&self) -> String {
        format!("line {}: invalid json", self.line_num)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid JSON on line {}: {}", self.line_num, self.message)
    }
}

impl std::error::Error for DecodeError {}

/// Decode a single line into a [`Record`].
///
/// `type` and `timestamp` are only honoured when they are strings; an
/// unparsable timestamp is dropped, not reported.
pub fn decode_line(line: &str, line_num: usize) -> Result<Decoded, DecodeError> {
    let value: Value = serde_json::from_str(line)
        .map_err(|e| DecodeError { line_num, message: e.to_string() })?;

    let mut object = match value {
        Value::Object(object) => object,
        _ => return Ok(Decoded::NotAnObject),
    };

    let record_type = object.get("type").and_then(Value::as_str).map(str::to_owned);
    let timestamp = object.get("timestamp").and_then(Value::as_str).and_then(parse_timestamp);
    let payload = object.remove("payload").map(unwrap_payload);

    Ok(Decoded::Record(Record { record_type, timestamp, payload }))
}

/// Undo the historical `{"payload": {"payload": {...}}}` nesting.
///
/// Only a mapping without its own `type` whose `payload` is itself a mapping is
/// unwrapped, and only by one level.
pub fn unwrap_payload(payload: Value) -> Value {
    match payload {
        Value::Object(mut map)
            if !map.contains_key("type") && map.get("payload").is_some_and(Value::is_object) =>
        {
            map.remove("payload").unwrap_or_default()
        }
        other => other,
    }
}

/// Iterator over `(line_num, line)` pairs with 1-based numbering.
///
/// Invalid UTF-8 is replaced with U+FFFD instead of failing the read. The first
/// I/O error is yielded once and ends the iteration.
pub struct LossyLines<R> {
    reader: R,
    line_num: usize,
    buf: Vec<u8>,
    done: bool,
}

impl<R: BufRead> LossyLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, line_num: 0, buf: Vec::new(), done: false }
    }
}

impl<R: BufRead> Iterator for LossyLines<R> {
    type Item = (usize, io::Result<String>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_num += 1;
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                let line = String::from_utf8_lossy(&self.buf).into_owned();
                Some((self.line_num, Ok(line)))
            }
            Err(e) => {
                self.done = true;
                Some((self.line_num + 1, Err(e)))
            }
        }
    }
}
