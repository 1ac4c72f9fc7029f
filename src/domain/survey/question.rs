//! Questions, their answer shapes, and multiple-choice options.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{OptionId, QuestionId, SurveyId, ValidationError};

/// The answer-type contract of a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    FreeText,
    Rating,
    YesNo,
}

impl QuestionType {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "multiple",
            QuestionType::FreeText => "text",
            QuestionType::Rating => "rating",
            QuestionType::YesNo => "yes_no",
        }
    }
}

impl FromStr for QuestionType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple" => Ok(QuestionType::MultipleChoice),
            "text" => Ok(QuestionType::FreeText),
            "rating" => Ok(QuestionType::Rating),
            "yes_no" => Ok(QuestionType::YesNo),
            other => Err(ValidationError::invalid_format(
                "question_type",
                format!("unknown question type '{}'", other),
            )),
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single question within a survey.
///
/// Questions are sequenced by strictly increasing `order`. Gaps are allowed;
/// a question without an order is never shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub survey_id: SurveyId,
    pub text: String,
    pub question_type: QuestionType,
    pub order: Option<i32>,
    pub is_required: bool,
}

impl Question {
    /// Creates a required question at the given position.
    pub fn new(
        survey_id: SurveyId,
        text: impl Into<String>,
        question_type: QuestionType,
        order: i32,
    ) -> Self {
        Self {
            id: QuestionId::new(),
            survey_id,
            text: text.into(),
            question_type,
            order: Some(order),
            is_required: true,
        }
    }

    /// Marks the question as optional.
    pub fn optional(mut self) -> Self {
        self.is_required = false;
        self
    }

    /// Removes the question from sequencing.
    pub fn unordered(mut self) -> Self {
        self.order = None;
        self
    }

    /// Returns true if the question takes part in sequencing.
    pub fn is_sequenced(&self) -> bool {
        self.order.is_some()
    }
}

/// A selectable option of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyOption {
    pub id: OptionId,
    pub question_id: QuestionId,
    pub text: String,
    pub order: i32,
}

impl SurveyOption {
    pub fn new(question_id: QuestionId, text: impl Into<String>, order: i32) -> Self {
        Self {
            id: OptionId::new(),
            question_id,
            text: text.into(),
            order,
        }
    }
}

/// What the bot expects as the next answer, remembered in the session.
///
/// The option map only exists for multiple-choice questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ExpectedAnswer {
    MultipleChoice { options: BTreeMap<String, OptionId> },
    YesNo,
    Rating,
    FreeText,
}

impl ExpectedAnswer {
    /// Builds the expected answer for a multiple-choice question from its
    /// options in display order, keyed "1".."N".
    pub fn multiple_choice<'a>(options: impl IntoIterator<Item = &'a SurveyOption>) -> Self {
        let options = options
            .into_iter()
            .enumerate()
            .map(|(idx, option)| ((idx + 1).to_string(), option.id))
            .collect();
        ExpectedAnswer::MultipleChoice { options }
    }

    /// The question type this expectation was built for.
    pub fn shape(&self) -> QuestionType {
        match self {
            ExpectedAnswer::MultipleChoice { .. } => QuestionType::MultipleChoice,
            ExpectedAnswer::YesNo => QuestionType::YesNo,
            ExpectedAnswer::Rating => QuestionType::Rating,
            ExpectedAnswer::FreeText => QuestionType::FreeText,
        }
    }
}
