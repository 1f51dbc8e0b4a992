//! Static question records and the ordered bank that holds them.

use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use demandlab_core::ValidationError;
use serde::{Deserialize, Serialize};

use crate::QuizError;

/// Stable key of a question, lowercase snake_case.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let valid = trimmed
            .chars()
            .next()
            .is_some_and(|first| first.is_ascii_lowercase())
            && trimmed
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_');
        if !valid {
            return Err(ValidationError::InvalidQuestionId {
                value: input.to_owned(),
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for QuestionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for QuestionId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QuestionId> for String {
    fn from(value: QuestionId) -> Self {
        value.0
    }
}

/// One selectable answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub label: String,
    pub value: String,
}

impl QuizOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// A fixed-schema question record. Construction checks that option values
/// are unique and that the correct value is one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    id: QuestionId,
    title: String,
    description: String,
    prompt: String,
    options: Vec<QuizOption>,
    correct_value: String,
    explanation: String,
    hint: String,
}

impl QuizQuestion {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: &str,
        title: impl Into<String>,
        description: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<QuizOption>,
        correct_value: impl Into<String>,
        explanation: impl Into<String>,
        hint: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let id = QuestionId::parse(id)?;
        let correct_value = correct_value.into();

        if options.len() < 2 {
            return Err(ValidationError::TooFewOptions {
                question: id.to_string(),
            });
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.value.as_str()) {
                return Err(ValidationError::DuplicateOption {
                    question: id.to_string(),
                    value: option.value.clone(),
                });
            }
        }

        if !seen.contains(correct_value.as_str()) {
            return Err(ValidationError::CorrectValueNotOffered {
                question: id.to_string(),
                value: correct_value,
            });
        }

        Ok(Self {
            id,
            title: title.into(),
            description: description.into(),
            prompt: prompt.into(),
            options,
            correct_value,
            explanation: explanation.into(),
            hint: hint.into(),
        })
    }

    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    pub fn correct_value(&self) -> &str {
        &self.correct_value
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn offers(&self, value: &str) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

/// Ordered, read-only question sequence shared by every session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionBank {
    title: String,
    questions: Vec<QuizQuestion>,
    takeaways: Vec<String>,
}

impl QuestionBank {
    pub fn new(
        title: impl Into<String>,
        questions: Vec<QuizQuestion>,
        takeaways: Vec<String>,
    ) -> Result<Self, ValidationError> {
        if questions.is_empty() {
            return Err(ValidationError::EmptyQuestionBank);
        }

        let mut seen = HashSet::with_capacity(questions.len());
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(ValidationError::DuplicateQuestion {
                    id: question.id().to_string(),
                });
            }
        }

        Ok(Self {
            title: title.into(),
            questions,
            takeaways,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn questions(&self) -> &[QuizQuestion] {
        &self.questions
    }

    pub fn takeaways(&self) -> &[String] {
        &self.takeaways
    }

    pub fn at(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }

    pub fn position(&self, id: &QuestionId) -> Option<usize> {
        self.questions.iter().position(|question| question.id() == id)
    }

    pub fn get(&self, id: &QuestionId) -> Result<&QuizQuestion, QuizError> {
        self.questions
            .iter()
            .find(|question| question.id() == id)
            .ok_or_else(|| QuizError::UnknownQuestion { id: id.to_string() })
    }

    pub fn contains(&self, id: &QuestionId) -> bool {
        self.position(id).is_some()
    }

    /// The six-question "factors affecting investment demand" self-test.
    pub fn investment_demand() -> Result<Self, ValidationError> {
        let direction_options = |fourth_label: &str, fourth_value: &str| {
            vec![
                QuizOption::new("Investment demand increases", "increase"),
                QuizOption::new("Investment demand decreases", "decrease"),
                QuizOption::new("Investment demand remains unchanged", "unchanged"),
                QuizOption::new(fourth_label, fourth_value),
            ]
        };

        let questions = vec![
            QuizQuestion::new(
                "acquisition_costs",
                "Acquisition, Maintenance, and Operating Costs",
                "These are the costs associated with purchasing, maintaining, and operating capital goods.",
                "If the cost of machinery and equipment increases significantly, what happens to the demand for investment?",
                direction_options("Investment demand becomes unpredictable", "unpredictable"),
                "decrease",
                "When acquisition, maintenance, or operating costs increase, the expected net return on investment decreases. This makes fewer investment projects profitable at any given interest rate, shifting the investment demand curve to the left (decreasing investment demand).",
                "Think about profitability: If costs go up, do profits go up or down?",
            )?,
            QuizQuestion::new(
                "business_taxes",
                "Business Taxes",
                "Taxes on business profits and capital gains affect investment returns.",
                "If the government reduces corporate tax rates, what is the likely effect on investment demand?",
                direction_options("Investment demand only changes for large corporations", "partial"),
                "increase",
                "Lower business taxes increase the after-tax returns on investment projects. This makes more investment projects profitable, shifting the investment demand curve to the right (increasing investment demand). Firms keep more of their profits, making investments more attractive.",
                "Consider after-tax returns: Lower taxes mean firms keep more of their profits.",
            )?,
            QuizQuestion::new(
                "technological_change",
                "Technological Change",
                "Innovations and technological improvements affect productivity and investment opportunities.",
                "When a breakthrough technology emerges that significantly improves productivity, what happens to investment demand?",
                direction_options("Investment demand initially decreases then increases", "complex"),
                "increase",
                "Technological advances increase the productivity of capital, raising the expected returns from investment projects. New technology often creates new investment opportunities and makes existing processes more efficient, shifting the investment demand curve to the right.",
                "New technology usually makes production more efficient and profitable.",
            )?,
            QuizQuestion::new(
                "capital_stock",
                "Stock of Capital Goods on Hand",
                "The existing amount of capital goods a firm already possesses.",
                "If a firm already has excess production capacity (unused machinery and equipment), what is the effect on its investment demand?",
                direction_options("Investment demand fluctuates randomly", "random"),
                "decrease",
                "When firms have excess capacity (large stock of unused capital goods), they have less need for new investment. They can meet increased demand by utilizing existing equipment rather than purchasing new capital, reducing investment demand.",
                "If you already have unused equipment, do you need to buy more?",
            )?,
            QuizQuestion::new(
                "inventory_changes",
                "Planned Inventory Changes",
                "Businesses adjust inventory levels based on expected future sales.",
                "If businesses expect future sales to increase and plan to build up inventories, what happens to investment demand?",
                direction_options("Only affects retail investment demand", "partial"),
                "increase",
                "Inventory investment is a component of total investment. When firms expect higher future sales, they increase inventory levels to meet anticipated demand. This planned inventory accumulation increases investment demand.",
                "Building inventory requires investment in goods to stock up.",
            )?,
            QuizQuestion::new(
                "expectations",
                "Business Expectations",
                "Future profit expectations influence current investment decisions.",
                "If businesses become pessimistic about future economic conditions and profit opportunities, what happens to current investment demand?",
                direction_options("Investment demand becomes more volatile", "volatile"),
                "decrease",
                "Investment decisions are forward-looking. Pessimistic expectations about future profits reduce the expected returns from current investments. Businesses postpone or cancel investment projects when they expect poor economic conditions, shifting investment demand to the left.",
                "Investment is about the future - optimism or pessimism matters!",
            )?,
        ];

        let takeaways = [
            "Investment demand is based on comparing expected returns with interest rates",
            "Factors that increase expected returns shift investment demand right (increase)",
            "Factors that decrease expected returns shift investment demand left (decrease)",
            "Investment decisions are forward-looking and depend heavily on expectations",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self::new("Investment Demand Self-Test", questions, takeaways)
    }
}
