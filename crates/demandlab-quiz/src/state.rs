//! Quiz progress as a pure reducer: every operation takes a [`QuizState`]
//! and returns the next one, so the caller decides where a session's state
//! lives.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::view::{Progress, QuestionView, Summary};
use crate::{QuestionBank, QuestionId, QuizError};

/// Per-question answer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    Unanswered,
    Correct,
    Incorrect,
}

/// One session's position and answers. Only [`QuizMachine`] builds it, so
/// every answer key names a bank question and the index is always in range.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuizState {
    current_index: usize,
    answers: BTreeMap<QuestionId, AnswerStatus>,
}

impl QuizState {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn answers(&self) -> &BTreeMap<QuestionId, AnswerStatus> {
        &self.answers
    }

    pub fn status(&self, id: &QuestionId) -> AnswerStatus {
        self.answers
            .get(id)
            .copied()
            .unwrap_or(AnswerStatus::Unanswered)
    }

    /// Answers with `status`, counting only questions `bank` knows.
    pub fn count(&self, bank: &QuestionBank, status: AnswerStatus) -> usize {
        self.answers
            .iter()
            .filter(|(id, s)| **s == status && bank.contains(id))
            .count()
    }

    pub fn has_answers(&self) -> bool {
        !self.answers.is_empty()
    }

    /// Untrusted form of this state, for handing to a transport.
    pub fn snapshot(&self) -> SavedQuizState {
        SavedQuizState {
            current_index: self.current_index,
            answers: self
                .answers
                .iter()
                .map(|(id, status)| (id.to_string(), *status))
                .collect(),
        }
    }
}

/// Quiz state as it comes back from outside the process. Turned into a
/// [`QuizState`] only through [`QuizMachine::restore`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedQuizState {
    pub current_index: usize,
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerStatus>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Prev,
    Next,
}

/// Content shown after a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub question: QuestionId,
    pub status: AnswerStatus,
    pub headline: String,
    pub message: String,
}

/// Transport-independent quiz input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuizEvent {
    Navigate {
        direction: Direction,
    },
    Submit {
        question: QuestionId,
        selected: Option<String>,
    },
    RequestHint {
        question: QuestionId,
    },
    Reset,
}

/// Output of [`QuizMachine::dispatch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: QuizState,
    pub feedback: Option<Feedback>,
    pub hint: Option<String>,
}

impl Transition {
    fn state(state: QuizState) -> Self {
        Self {
            state,
            feedback: None,
            hint: None,
        }
    }
}

/// Stateless driver over a shared, read-only question bank.
#[derive(Debug, Clone, Copy)]
pub struct QuizMachine<'a> {
    bank: &'a QuestionBank,
}

impl<'a> QuizMachine<'a> {
    pub const fn new(bank: &'a QuestionBank) -> Self {
        Self { bank }
    }

    pub const fn bank(&self) -> &'a QuestionBank {
        self.bank
    }

    /// Move one question back or forward. Boundaries are no-ops.
    pub fn navigate(&self, mut state: QuizState, direction: Direction) -> QuizState {
        let last = self.bank.len().saturating_sub(1);
        let index = state.current_index.min(last);
        state.current_index = match direction {
            Direction::Prev => index.saturating_sub(1),
            Direction::Next => (index + 1).min(last),
        };
        debug!(?direction, index = state.current_index, "navigated quiz");
        state
    }

    /// Record an answer. With nothing selected the state is returned
    /// untouched and no feedback is produced.
    pub fn submit(
        &self,
        mut state: QuizState,
        question: &QuestionId,
        selected: Option<&str>,
    ) -> Result<(QuizState, Option<Feedback>), QuizError> {
        let record = self.bank.get(question)?;
        let Some(value) = selected else {
            return Ok((state, None));
        };

        if !record.offers(value) {
            return Err(QuizError::InvalidSelection {
                question: question.to_string(),
                value: value.to_owned(),
            });
        }

        let status = if value == record.correct_value() {
            AnswerStatus::Correct
        } else {
            AnswerStatus::Incorrect
        };
        state.answers.insert(question.clone(), status);
        debug!(question = %question, ?status, "recorded quiz answer");

        let feedback = self.feedback(question, status)?;
        Ok((state, feedback))
    }

    /// Rebuild a state from a saved copy. Unknown question ids are rejected;
    /// an index past the last question is clamped to it.
    pub fn restore(&self, saved: SavedQuizState) -> Result<QuizState, QuizError> {
        let mut answers = BTreeMap::new();
        for (raw, status) in saved.answers {
            let id = QuestionId::parse(&raw).map_err(|_| QuizError::UnknownQuestion {
                id: raw.clone(),
            })?;
            if !self.bank.contains(&id) {
                return Err(QuizError::UnknownQuestion { id: raw });
            }
            if status != AnswerStatus::Unanswered {
                answers.insert(id, status);
            }
        }

        let current_index = saved
            .current_index
            .min(self.bank.len().saturating_sub(1));
        debug!(current_index, answered = answers.len(), "restored quiz state");

        Ok(QuizState {
            current_index,
            answers,
        })
    }

    /// Fresh state: no answers, first question.
    pub fn reset(&self) -> QuizState {
        debug!("reset quiz");
        QuizState::new()
    }

    pub fn hint(&self, question: &QuestionId) -> Result<&'a str, QuizError> {
        Ok(self.bank.get(question)?.hint())
    }

    /// Stored feedback for an already-answered question, for re-display.
    pub fn feedback_for(
        &self,
        state: &QuizState,
        question: &QuestionId,
    ) -> Result<Option<Feedback>, QuizError> {
        self.feedback(question, state.status(question))
    }

    pub fn dispatch(&self, state: QuizState, event: QuizEvent) -> Result<Transition, QuizError> {
        match event {
            QuizEvent::Navigate { direction } => {
                Ok(Transition::state(self.navigate(state, direction)))
            }
            QuizEvent::Submit { question, selected } => {
                let (state, feedback) = self.submit(state, &question, selected.as_deref())?;
                Ok(Transition {
                    feedback,
                    ..Transition::state(state)
                })
            }
            QuizEvent::RequestHint { question } => {
                let hint = self.hint(&question)?.to_owned();
                Ok(Transition {
                    hint: Some(hint),
                    ..Transition::state(state)
                })
            }
            QuizEvent::Reset => Ok(Transition::state(self.reset())),
        }
    }

    pub fn progress(&self, state: &QuizState) -> Progress {
        Progress::of(state, self.bank)
    }

    pub fn summary(&self, state: &QuizState) -> Summary {
        Summary::of(state, self.bank)
    }

    /// View of the question under the cursor.
    pub fn current(&self, state: &QuizState) -> Result<QuestionView, QuizError> {
        let index = state.current_index.min(self.bank.len().saturating_sub(1));
        let question = self
            .bank
            .at(index)
            .ok_or_else(|| QuizError::UnknownQuestion {
                id: format!("#{index}"),
            })?;
        let feedback = self.feedback_for(state, question.id())?;
        Ok(QuestionView::new(
            question,
            index,
            self.bank.len(),
            state.status(question.id()),
            feedback,
        ))
    }

    fn feedback(
        &self,
        question: &QuestionId,
        status: AnswerStatus,
    ) -> Result<Option<Feedback>, QuizError> {
        let record = self.bank.get(question)?;
        let (headline, message) = match status {
            AnswerStatus::Unanswered => return Ok(None),
            AnswerStatus::Correct => ("Correct!", "Well done! You understand this concept."),
            AnswerStatus::Incorrect => ("Incorrect", record.explanation()),
        };

        Ok(Some(Feedback {
            question: question.clone(),
            status,
            headline: headline.to_owned(),
            message: message.to_owned(),
        }))
    }
}
