//! Derived, read-only views of a quiz session: progress bar segments, the
//! final summary, and the question card under the cursor.

use serde::{Deserialize, Serialize};

use crate::{AnswerStatus, Feedback, QuestionBank, QuestionId, QuizOption, QuizQuestion, QuizState};

const NOT_STARTED_MESSAGE: &str =
    "No answers submitted yet. Complete the quiz above to see your results!";

/// Answer counts and their share of the bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub correct: usize,
    pub incorrect: usize,
    pub unanswered: usize,
    pub total: usize,
    pub correct_pct: f64,
    pub incorrect_pct: f64,
    pub unanswered_pct: f64,
}

impl Progress {
    pub fn of(state: &QuizState, bank: &QuestionBank) -> Self {
        let total = bank.len();
        let correct = state.count(bank, AnswerStatus::Correct).min(total);
        let incorrect = state
            .count(bank, AnswerStatus::Incorrect)
            .min(total - correct);
        let unanswered = total.saturating_sub(correct + incorrect);

        Self {
            correct,
            incorrect,
            unanswered,
            total,
            correct_pct: percent(correct, total),
            incorrect_pct: percent(incorrect, total),
            unanswered_pct: percent(unanswered, total),
        }
    }

    pub const fn answered(&self) -> usize {
        self.correct + self.incorrect
    }
}

/// Performance band of a scored quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Perfect,
    Strong,
    Moderate,
    Weak,
}

impl ScoreBand {
    /// Band for `correct` out of `total`; thresholds are 100%, 80% and 60%.
    pub fn classify(correct: usize, total: usize) -> Self {
        if total > 0 && correct >= total {
            Self::Perfect
        } else if correct * 100 >= total * 80 {
            Self::Strong
        } else if correct * 100 >= total * 60 {
            Self::Moderate
        } else {
            Self::Weak
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Self::Perfect => {
                "Perfect score! You have mastered the factors affecting investment demand!"
            }
            Self::Strong => {
                "Great job! You have a strong understanding of investment demand factors."
            }
            Self::Moderate => {
                "Good effort! Review the explanations for incorrect answers to strengthen your understanding."
            }
            Self::Weak => "Keep studying! Review the explanations carefully and try again.",
        }
    }
}

/// End-of-quiz results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Summary {
    NotStarted {
        message: String,
    },
    Scored {
        correct: usize,
        total: usize,
        score_percent: u32,
        band: ScoreBand,
        message: String,
        takeaways: Vec<String>,
    },
}

impl Summary {
    pub fn of(state: &QuizState, bank: &QuestionBank) -> Self {
        let progress = Progress::of(state, bank);
        if progress.answered() == 0 {
            return Self::NotStarted {
                message: NOT_STARTED_MESSAGE.to_owned(),
            };
        }

        let Progress { correct, total, .. } = progress;
        let band = ScoreBand::classify(correct, total);

        Self::Scored {
            correct,
            total,
            score_percent: percent(correct, total).round() as u32,
            band,
            message: band.message().to_owned(),
            takeaways: bank.takeaways().to_vec(),
        }
    }

    /// "Your Score: 5/6 (83%)", or the not-started message.
    pub fn headline(&self) -> String {
        match self {
            Self::NotStarted { message } => message.clone(),
            Self::Scored {
                correct,
                total,
                score_percent,
                ..
            } => format!("Your Score: {correct}/{total} ({score_percent}%)"),
        }
    }
}

/// Everything needed to render one question card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionView {
    pub id: QuestionId,
    /// Zero-based position in the bank.
    pub index: usize,
    pub total: usize,
    /// "n. title" with a one-based `n`.
    pub heading: String,
    pub description: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
    pub status: AnswerStatus,
    pub can_go_prev: bool,
    pub can_go_next: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
}

impl QuestionView {
    pub fn new(
        question: &QuizQuestion,
        index: usize,
        total: usize,
        status: AnswerStatus,
        feedback: Option<Feedback>,
    ) -> Self {
        Self {
            id: question.id().clone(),
            index,
            total,
            heading: format!("{}. {}", index + 1, question.title()),
            description: question.description().to_owned(),
            prompt: question.prompt().to_owned(),
            options: question.options().to_vec(),
            status,
            can_go_prev: index > 0,
            can_go_next: index + 1 < total,
            feedback,
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    part as f64 / total as f64 * 100.0
}
