//! # Demandlab Quiz
//!
//! Multiple-choice self-test: a read-only [`QuestionBank`] and a
//! [`QuizMachine`] that advances a caller-owned [`QuizState`].
//!
//! ```rust
//! use demandlab_quiz::{Direction, QuestionBank, QuizMachine, QuizState};
//!
//! let bank = QuestionBank::investment_demand().expect("built-in bank");
//! let machine = QuizMachine::new(&bank);
//!
//! let state = machine.navigate(QuizState::new(), Direction::Next);
//! let question = bank.at(state.current_index()).expect("second question");
//! let (state, feedback) = machine
//!     .submit(state, question.id(), Some("increase"))
//!     .expect("valid submission");
//!
//! assert_eq!(feedback.map(|f| f.headline), Some(String::from("Correct!")));
//! assert_eq!(machine.progress(&state).correct, 1);
//! ```

pub mod error;
pub mod question;
pub mod state;
pub mod view;

pub use error::QuizError;
pub use question::{QuestionBank, QuestionId, QuizOption, QuizQuestion};
pub use state::{
    AnswerStatus, Direction, Feedback, QuizEvent, QuizMachine, QuizState, SavedQuizState,
    Transition,
};
pub use view::{Progress, QuestionView, ScoreBand, Summary};
