//! Survey domain module.
//!
//! Surveys, their ordered questions and options, user responses, and the
//! typed validation of chat input against a question's answer shape.

mod answer;
mod question;
mod response;
#[allow(clippy::module_inception)]
mod survey;

pub use answer::{Answer, AnswerFields, AnswerValue, InputRejection};
pub use question::{ExpectedAnswer, Question, QuestionType, SurveyOption};
pub use response::SurveyResponse;
pub use survey::{Survey, SurveyStatus, SurveyType};
