use std::io::Write;

use demandlab_core::UtcDateTime;
use serde::Serialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamEventType {
    Start,
    Chunk,
    End,
    Error,
}

/// Failure attached to an `error` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamEventError {
    pub code: String,
    pub message: String,
}

impl StreamEventError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct StreamEvent<'a> {
    event: StreamEventType,
    seq: u64,
    ts: UtcDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a StreamEventError>,
}

/// Newline-delimited JSON events numbered from 1. Every line is flushed so
/// an interactive reader sees each transition as soon as it happens.
pub struct NdjsonStreamWriter<W: Write> {
    writer: W,
    emitted: u64,
}

impl<W: Write> NdjsonStreamWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            emitted: 0,
        }
    }

    pub fn emit_start(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.write_event(StreamEventType::Start, data.as_ref(), None)
    }

    pub fn emit_chunk(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.write_event(StreamEventType::Chunk, data.as_ref(), None)
    }

    pub fn emit_end(&mut self, data: Option<Value>) -> Result<(), CliError> {
        self.write_event(StreamEventType::End, data.as_ref(), None)
    }

    pub fn emit_error(
        &mut self,
        error: StreamEventError,
        data: Option<Value>,
    ) -> Result<(), CliError> {
        self.write_event(StreamEventType::Error, data.as_ref(), Some(&error))
    }

    fn write_event(
        &mut self,
        event: StreamEventType,
        data: Option<&Value>,
        error: Option<&StreamEventError>,
    ) -> Result<(), CliError> {
        self.emitted += 1;
        let line = serde_json::to_vec(&StreamEvent {
            event,
            seq: self.emitted,
            ts: UtcDateTime::now(),
            data,
            error,
        })?;

        self.writer.write_all(&line)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush().map_err(CliError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn numbers_events_sequentially() {
        let mut sink = Vec::<u8>::new();

        {
            let mut writer = NdjsonStreamWriter::new(&mut sink);
            writer
                .emit_start(Some(json!({ "total": 6 })))
                .expect("start");
            writer
                .emit_chunk(Some(json!({ "action": "navigate" })))
                .expect("chunk");
            writer.emit_end(None).expect("end");
        }

        let events = std::str::from_utf8(&sink)
            .expect("utf8")
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).expect("json line"))
            .collect::<Vec<_>>();

        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["event"], "start");
        assert_eq!(events[1]["event"], "chunk");
        assert_eq!(events[2]["event"], "end");
        assert_eq!(events[2]["seq"], 3);
        assert!(events[2].get("data").is_none());
    }

    #[test]
    fn error_event_carries_code_and_message() {
        let mut sink = Vec::<u8>::new();

        {
            let mut writer = NdjsonStreamWriter::new(&mut sink);
            writer
                .emit_error(
                    StreamEventError::new("quiz.unknown_question", "unknown question 'x'"),
                    Some(json!({ "input": "x" })),
                )
                .expect("error event");
        }

        let line = std::str::from_utf8(&sink).expect("utf8");
        let event = serde_json::from_str::<Value>(line.trim()).expect("json");

        assert_eq!(event["event"], "error");
        assert_eq!(event.pointer("/error/code"), Some(&Value::from("quiz.unknown_question")));
        assert_eq!(event.pointer("/data/input"), Some(&Value::from("x")));
    }
}
