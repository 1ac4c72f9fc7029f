//! Per-user conversation session.
//!
//! A session is a tagged union over the three modes a chat can be in. Data
//! only exists in the mode that needs it, so an in-survey session always
//! carries its response and expected answer, and the option map can only
//! exist for a multiple-choice question.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::foundation::{QuestionId, ResponseId, SurveyId};
use crate::domain::survey::ExpectedAnswer;

/// Transient conversation state for one user. Absent means `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConversationSession {
    /// Free chat with the AI responder.
    #[default]
    Idle,

    /// A numbered survey menu was shown; the next text picks one.
    ChoosingSurvey {
        selection: BTreeMap<String, SurveyId>,
    },

    /// Answering a survey question.
    InSurvey(SurveyProgress),
}

/// Where a user is within a survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyProgress {
    pub survey_id: SurveyId,
    pub response_id: ResponseId,
    pub question_id: QuestionId,
    /// Stored `order` of the question on screen.
    pub question_order: i32,
    /// Zero-based number of questions already presented before this one.
    pub position: u32,
    pub expected: ExpectedAnswer,
}

/// Mode discriminant, for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    Idle,
    ChoosingSurvey,
    InSurvey,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::Idle => "idle",
            SessionMode::ChoosingSurvey => "choosing_survey",
            SessionMode::InSurvey => "in_survey",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConversationSession {
    /// Builds a survey menu session from surveys in display order, keyed
    /// "1".."N".
    pub fn choosing(surveys: impl IntoIterator<Item = SurveyId>) -> Self {
        let selection = surveys
            .into_iter()
            .enumerate()
            .map(|(idx, id)| ((idx + 1).to_string(), id))
            .collect();
        ConversationSession::ChoosingSurvey { selection }
    }

    pub fn mode(&self) -> SessionMode {
        match self {
            ConversationSession::Idle => SessionMode::Idle,
            ConversationSession::ChoosingSurvey { .. } => SessionMode::ChoosingSurvey,
            ConversationSession::InSurvey(_) => SessionMode::InSurvey,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ConversationSession::Idle)
    }

    /// Looks up a menu selection. Only meaningful while choosing.
    pub fn selected_survey(&self, key: &str) -> Option<SurveyId> {
        match self {
            ConversationSession::ChoosingSurvey { selection } => selection.get(key.trim()).copied(),
            _ => None,
        }
    }

    pub fn progress(&self) -> Option<&SurveyProgress> {
        match self {
            ConversationSession::InSurvey(progress) => Some(progress),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress() -> SurveyProgress {
        SurveyProgress {
            survey_id: SurveyId::new(),
            response_id: ResponseId::new(),
            question_id: QuestionId::new(),
            question_order: 10,
            position: 0,
            expected: ExpectedAnswer::Rating,
        }
    }

    #[test]
    fn default_session_is_idle() {
        assert!(ConversationSession::default().is_idle());
        assert_eq!(ConversationSession::default().mode(), SessionMode::Idle);
    }

    #[test]
    fn choosing_keys_are_one_based() {
        let first = SurveyId::new();
        let second = SurveyId::new();
        let session = ConversationSession::choosing([first, second]);

        assert_eq!(session.mode(), SessionMode::ChoosingSurvey);
        assert_eq!(session.selected_survey("1"), Some(first));
        assert_eq!(session.selected_survey(" 2 "), Some(second));
        assert_eq!(session.selected_survey("3"), None);
        assert_eq!(session.selected_survey("0"), None);
    }

    #[test]
    fn selection_is_ignored_outside_menu() {
        let session = ConversationSession::InSurvey(progress());
        assert_eq!(session.selected_survey("1"), None);
    }

    #[test]
    fn in_survey_roundtrips_through_json() {
        let session = ConversationSession::InSurvey(progress());
        let json = serde_json::to_string(&session).unwrap();
        assert!(json.contains(r#""mode":"in_survey""#));

        let back: ConversationSession = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }

    #[test]
    fn idle_serializes_to_mode_tag_only() {
        let json = serde_json::to_string(&ConversationSession::Idle).unwrap();
        assert_eq!(json, r#"{"mode":"idle"}"#);
    }
}
