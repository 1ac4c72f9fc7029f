//! Survey flow handlers.

mod answer_recorder;
mod question_presenter;
mod survey_catalog;
mod survey_flow;

pub use answer_recorder::{AnswerRecorder, RecordedAnswer};
pub use question_presenter::{format_question, QuestionPresenter, RenderedQuestion};
pub use survey_catalog::{SurveyCatalog, MENU_LIMIT};
pub use survey_flow::{FlowError, FlowStep, SurveyFlowController};
