//! Line-oriented quiz session.
//!
//! Each input line is one command; each command produces exactly one NDJSON
//! event. A JSON object line is decoded as a raw [`QuizEvent`].

use std::io::{BufRead, Write};

use demandlab_quiz::{
    Direction, QuestionBank, QuestionId, QuizError, QuizEvent, QuizMachine, QuizState,
};
use serde_json::json;
use tracing::debug;

use crate::error::CliError;
use crate::output::stream_writer::{NdjsonStreamWriter, StreamEventError};

#[derive(Debug, PartialEq)]
enum SessionCommand {
    Show,
    Progress,
    Summary,
    Quit,
    Event(QuizEvent),
}

fn parse_command(line: &str, current: &QuestionId) -> Result<SessionCommand, StreamEventError> {
    if line.starts_with('{') {
        return serde_json::from_str(line)
            .map(SessionCommand::Event)
            .map_err(|error| StreamEventError::new("quiz.bad_event", error.to_string()));
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    let command = match verb.to_ascii_lowercase().as_str() {
        "show" => SessionCommand::Show,
        "progress" => SessionCommand::Progress,
        "summary" => SessionCommand::Summary,
        "quit" | "exit" => SessionCommand::Quit,
        "next" => SessionCommand::Event(QuizEvent::Navigate {
            direction: Direction::Next,
        }),
        "prev" => SessionCommand::Event(QuizEvent::Navigate {
            direction: Direction::Prev,
        }),
        "reset" => SessionCommand::Event(QuizEvent::Reset),
        "hint" => SessionCommand::Event(QuizEvent::RequestHint {
            question: current.clone(),
        }),
        "answer" => SessionCommand::Event(QuizEvent::Submit {
            question: current.clone(),
            selected: (!rest.is_empty()).then(|| rest.to_owned()),
        }),
        other => {
            return Err(StreamEventError::new(
                "quiz.unknown_command",
                format!("unknown command '{other}'"),
            ))
        }
    };

    Ok(command)
}

const fn action(event: &QuizEvent) -> &'static str {
    match event {
        QuizEvent::Navigate { .. } => "navigate",
        QuizEvent::Submit { .. } => "submit",
        QuizEvent::RequestHint { .. } => "hint",
        QuizEvent::Reset => "reset",
    }
}

fn quiz_error(error: &QuizError) -> StreamEventError {
    StreamEventError::new(error.code(), error.to_string())
}

/// Run one quiz session until `quit` or end of input. State lives only for
/// the duration of the call.
pub fn run_session<R: BufRead, W: Write>(input: R, output: W) -> Result<(), CliError> {
    let bank = QuestionBank::investment_demand()?;
    let machine = QuizMachine::new(&bank);
    let mut state = QuizState::new();
    let mut writer = NdjsonStreamWriter::new(output);

    writer.emit_start(Some(json!({
        "title": bank.title(),
        "total": bank.len(),
        "question": serde_json::to_value(machine.current(&state)?)?,
    })))?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let current = machine.current(&state)?;
        let command = match parse_command(line, &current.id) {
            Ok(command) => command,
            Err(error) => {
                writer.emit_error(error, Some(json!({ "input": line })))?;
                continue;
            }
        };
        debug!(?command, "quiz command");

        match command {
            SessionCommand::Quit => break,
            SessionCommand::Show => writer.emit_chunk(Some(json!({
                "action": "show",
                "question": serde_json::to_value(&current)?,
            })))?,
            SessionCommand::Progress => writer.emit_chunk(Some(json!({
                "action": "progress",
                "progress": serde_json::to_value(machine.progress(&state))?,
            })))?,
            SessionCommand::Summary => {
                let summary = machine.summary(&state);
                writer.emit_chunk(Some(json!({
                    "action": "summary",
                    "headline": summary.headline(),
                    "summary": serde_json::to_value(&summary)?,
                })))?;
            }
            SessionCommand::Event(event) => {
                let action = action(&event);
                match machine.dispatch(state.clone(), event) {
                    Ok(transition) => {
                        state = transition.state;
                        writer.emit_chunk(Some(json!({
                            "action": action,
                            "question": serde_json::to_value(machine.current(&state)?)?,
                            "feedback": serde_json::to_value(&transition.feedback)?,
                            "hint": transition.hint,
                            "progress": serde_json::to_value(machine.progress(&state))?,
                        })))?;
                    }
                    Err(error) => writer.emit_error(quiz_error(&error), None)?,
                }
            }
        }
    }

    let summary = machine.summary(&state);
    writer.emit_end(Some(json!({
        "headline": summary.headline(),
        "summary": serde_json::to_value(&summary)?,
    })))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use serde_json::Value;

    use super::*;

    fn session(script: &str) -> Vec<Value> {
        let mut sink = Vec::<u8>::new();
        run_session(Cursor::new(script.to_owned()), &mut sink).expect("session runs");

        std::str::from_utf8(&sink)
            .expect("utf8")
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).expect("json line"))
            .collect()
    }

    fn id(value: &str) -> QuestionId {
        QuestionId::parse(value).expect("valid id")
    }

    #[test]
    fn parses_answer_with_and_without_value() {
        let current = id("business_taxes");
        assert_eq!(
            parse_command("answer increase", &current).expect("parses"),
            SessionCommand::Event(QuizEvent::Submit {
                question: current.clone(),
                selected: Some(String::from("increase")),
            })
        );
        assert_eq!(
            parse_command("answer", &current).expect("parses"),
            SessionCommand::Event(QuizEvent::Submit {
                question: current.clone(),
                selected: None,
            })
        );
    }

    #[test]
    fn rejects_unknown_command() {
        let err = parse_command("skip", &id("expectations")).expect_err("must fail");
        assert_eq!(err.code, "quiz.unknown_command");
    }

    #[test]
    fn emits_one_event_per_command_between_start_and_end() {
        let events = session("show\nanswer decrease\nnext\nhint\nquit\nshow\n");

        let kinds = events
            .iter()
            .map(|event| event["event"].as_str().expect("event type"))
            .collect::<Vec<_>>();
        assert_eq!(kinds, ["start", "chunk", "chunk", "chunk", "chunk", "end"]);

        assert_eq!(events[2]["data"]["feedback"]["headline"], "Correct!");
        assert_eq!(events[3]["data"]["question"]["index"], 1);
        assert_eq!(
            events[4]["data"]["hint"],
            "Consider after-tax returns: Lower taxes mean firms keep more of their profits."
        );
        assert_eq!(
            events[5]["data"]["headline"],
            "Your Score: 1/6 (17%)"
        );
    }

    #[test]
    fn invalid_value_reports_error_and_session_continues() {
        let events = session("answer maybe\nprogress\n");

        assert_eq!(events[1]["event"], "error");
        assert_eq!(events[1]["error"]["code"], "quiz.invalid_selection");
        assert_eq!(events[2]["data"]["progress"]["unanswered"], 6);
    }

    #[test]
    fn raw_json_events_are_accepted() {
        let events = session(
            "{\"type\":\"submit\",\"question\":\"expectations\",\"selected\":\"increase\"}\n",
        );

        assert_eq!(events[1]["data"]["action"], "submit");
        assert_eq!(events[1]["data"]["feedback"]["headline"], "Incorrect");
        assert_eq!(events[1]["data"]["progress"]["incorrect"], 1);
    }

    #[test]
    fn end_event_without_answers_reports_not_started() {
        let events = session("");

        assert_eq!(events.len(), 2);
        assert_eq!(events[1]["data"]["summary"]["status"], "not_started");
    }
}
