//! Shared wiring for dispatcher scenarios: every port backed by the
//! in-memory adapters, a queue-driven AI responder, and a recording
//! transport.

#![allow(dead_code)]

use std::sync::Arc;

use recruitment_bot::adapters::ai::MockAiResponder;
use recruitment_bot::adapters::memory::{
    InMemoryChatStore, InMemorySessionStore, InMemorySurveyStore, RecordingTransport,
};
use recruitment_bot::application::handlers::survey::{
    AnswerRecorder, QuestionPresenter, SurveyCatalog, SurveyFlowController,
};
use recruitment_bot::application::{AiChatHandler, DispatchOutcome, MessageDispatcher};
use recruitment_bot::domain::chat::{InboundText, UserProfile};
use recruitment_bot::domain::conversation::ConversationSession;
use recruitment_bot::domain::foundation::UserId;
use recruitment_bot::domain::survey::{
    Question, QuestionType, Survey, SurveyOption, SurveyStatus, SurveyType,
};
use recruitment_bot::ports::SessionStore;

pub struct Harness {
    pub surveys: InMemorySurveyStore,
    pub chat: InMemoryChatStore,
    pub sessions: InMemorySessionStore,
    pub responder: MockAiResponder,
    pub transport: RecordingTransport,
    pub dispatcher: Arc<MessageDispatcher>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_responder(MockAiResponder::new())
    }

    pub fn with_responder(responder: MockAiResponder) -> Self {
        let surveys = InMemorySurveyStore::new();
        let chat = InMemoryChatStore::new();
        let sessions = InMemorySessionStore::new();
        let transport = RecordingTransport::new();

        let catalog = SurveyCatalog::new(Arc::new(surveys.clone()));
        let flow = SurveyFlowController::new(
            catalog.clone(),
            QuestionPresenter::new(catalog),
            AnswerRecorder::new(Arc::new(surveys.clone())),
            Arc::new(surveys.clone()),
        );
        let ai_chat = AiChatHandler::new(
            Arc::new(chat.clone()),
            Arc::new(responder.clone()),
            Arc::new(transport.clone()),
        );
        let dispatcher = Arc::new(MessageDispatcher::new(
            Arc::new(chat.clone()),
            Arc::new(sessions.clone()),
            flow,
            ai_chat,
            Arc::new(transport.clone()),
        ));

        Self {
            surveys,
            chat,
            sessions,
            responder,
            transport,
            dispatcher,
        }
    }

    /// Sends `text` as `user` and expects the turn to succeed.
    pub async fn send(&self, user: i64, text: &str) -> DispatchOutcome {
        self.dispatcher
            .handle_incoming_text(&inbound(user, text))
            .await
            .unwrap_or_else(|e| panic!("turn {:?} failed: {}", text, e))
    }

    pub async fn session(&self, user: i64) -> ConversationSession {
        self.sessions.get(&UserId::from(user)).await.unwrap()
    }

    pub async fn last_reply(&self) -> String {
        self.transport.last_text().await.unwrap_or_default()
    }

    pub async fn add_survey(&self, title: &str) -> Survey {
        let survey = Survey::new(title, format!("{} survey", title), SurveyType::Other)
            .unwrap()
            .with_status(SurveyStatus::Active);
        self.surveys.insert_survey(survey.clone()).await;
        survey
    }

    pub async fn add_question(
        &self,
        survey: &Survey,
        text: &str,
        question_type: QuestionType,
        order: i32,
    ) -> Question {
        let question = Question::new(survey.id, text, question_type, order);
        self.surveys.insert_question(question.clone()).await;
        question
    }

    pub async fn add_options(&self, question: &Question, texts: &[&str]) -> Vec<SurveyOption> {
        let mut options = Vec::new();
        for (idx, text) in texts.iter().enumerate() {
            let option = SurveyOption::new(question.id, *text, idx as i32 + 1);
            self.surveys.insert_option(option.clone()).await;
            options.push(option);
        }
        options
    }
}

pub fn inbound(user: i64, text: &str) -> InboundText {
    InboundText::new(
        UserProfile::new(UserId::from(user)).with_first_name("Laura"),
        text,
    )
}
