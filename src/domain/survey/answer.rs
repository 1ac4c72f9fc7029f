//! Answer validation and the stored answer record.
//!
//! Validation never raises: raw chat input is turned into either a typed
//! [`AnswerValue`] or an [`InputRejection`] that tells the user how to retry.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ExpectedAnswer;
use crate::domain::foundation::{AnswerId, OptionId, QuestionId, Rating, ResponseId, Timestamp};

/// A validated answer, typed by the question's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    SelectedOption(OptionId),
    YesNo(bool),
    Rating(Rating),
    FreeText(String),
}

/// Why raw input was not accepted for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InputRejection {
    #[error("input does not match any listed option")]
    UnknownOption,

    #[error("input is neither 1 nor 2")]
    NotYesNo,

    #[error("input is not a whole number from 1 to 5")]
    NotARating,

    #[error("input is empty")]
    EmptyText,
}

impl ExpectedAnswer {
    /// Validates raw chat input against this expectation.
    ///
    /// Input is trimmed for every shape except free text, which is stored
    /// verbatim once it is known to contain something.
    pub fn parse(&self, raw: &str) -> Result<AnswerValue, InputRejection> {
        let trimmed = raw.trim();
        match self {
            ExpectedAnswer::MultipleChoice { options } => options
                .get(trimmed)
                .copied()
                .map(AnswerValue::SelectedOption)
                .ok_or(InputRejection::UnknownOption),
            ExpectedAnswer::YesNo => match trimmed {
                "1" => Ok(AnswerValue::YesNo(true)),
                "2" => Ok(AnswerValue::YesNo(false)),
                _ => Err(InputRejection::NotYesNo),
            },
            ExpectedAnswer::Rating => trimmed
                .parse::<i16>()
                .ok()
                .and_then(|n| Rating::try_new(n).ok())
                .map(AnswerValue::Rating)
                .ok_or(InputRejection::NotARating),
            ExpectedAnswer::FreeText => {
                if trimmed.is_empty() {
                    Err(InputRejection::EmptyText)
                } else {
                    Ok(AnswerValue::FreeText(raw.to_string()))
                }
            }
        }
    }
}

/// Storage columns of an answer. Exactly one is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFields {
    pub selected_option_id: Option<OptionId>,
    pub rating: Option<Rating>,
    pub answer_text: Option<String>,
}

impl AnswerFields {
    /// Returns true if exactly one column is populated.
    pub fn is_well_formed(&self) -> bool {
        let populated = [
            self.selected_option_id.is_some(),
            self.rating.is_some(),
            self.answer_text.is_some(),
        ];
        populated.iter().filter(|p| **p).count() == 1
    }
}

impl From<AnswerValue> for AnswerFields {
    fn from(value: AnswerValue) -> Self {
        match value {
            AnswerValue::SelectedOption(id) => AnswerFields {
                selected_option_id: Some(id),
                ..Default::default()
            },
            AnswerValue::YesNo(yes) => AnswerFields {
                answer_text: Some(if yes { "yes" } else { "no" }.to_string()),
                ..Default::default()
            },
            AnswerValue::Rating(rating) => AnswerFields {
                rating: Some(rating),
                ..Default::default()
            },
            AnswerValue::FreeText(text) => AnswerFields {
                answer_text: Some(text),
                ..Default::default()
            },
        }
    }
}

/// One recorded answer to one question within a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub response_id: ResponseId,
    pub question_id: QuestionId,
    pub fields: AnswerFields,
    pub answered_at: Timestamp,
}

impl Answer {
    pub fn new(response_id: ResponseId, question_id: QuestionId, fields: AnswerFields) -> Self {
        Self {
            id: AnswerId::new(),
            response_id,
            question_id,
            fields,
            answered_at: Timestamp::now(),
        }
    }
}
