//! Slash commands and the handler for the ones that do not touch the session.

use std::fmt;
use std::sync::Arc;

use crate::application::replies;
use crate::domain::chat::ChatUser;
use crate::domain::foundation::DomainError;
use crate::ports::ChatRepository;

/// Job offers listed by `/jobs`.
pub const JOBS_LIMIT: usize = 5;

/// A parsed `/command`. Spanish aliases are accepted for existing users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Profile,
    Jobs,
    Survey,
    Cancel,
    Unknown(String),
}

impl Command {
    /// Parses text starting with `/`. Arguments and a `@botname` suffix are
    /// ignored. Returns `None` for anything that is not a command.
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.trim_start().strip_prefix('/')?;
        let word = rest.split_whitespace().next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default().to_lowercase();

        let command = match name.as_str() {
            "start" => Command::Start,
            "help" | "ayuda" => Command::Help,
            "profile" | "perfil" => Command::Profile,
            "jobs" | "ofertas" => Command::Jobs,
            "survey" | "encuesta" => Command::Survey,
            "cancel" | "cancelar" => Command::Cancel,
            _ => Command::Unknown(name),
        };
        Some(command)
    }

    pub fn name(&self) -> &str {
        match self {
            Command::Start => "start",
            Command::Help => "help",
            Command::Profile => "profile",
            Command::Jobs => "jobs",
            Command::Survey => "survey",
            Command::Cancel => "cancel",
            Command::Unknown(name) => name.as_str(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.name())
    }
}

/// Answers `/start`, `/help`, `/profile`, `/jobs` and unknown commands.
#[derive(Clone)]
pub struct CommandHandler {
    chat: Arc<dyn ChatRepository>,
}

impl CommandHandler {
    pub fn new(chat: Arc<dyn ChatRepository>) -> Self {
        Self { chat }
    }

    /// Replies for an informational command, in send order.
    pub async fn handle(
        &self,
        user: &ChatUser,
        command: &Command,
    ) -> Result<Vec<String>, DomainError> {
        let out = match command {
            Command::Start => vec![replies::welcome(&user.first_name)],
            Command::Help => vec![replies::HELP.to_string()],
            Command::Profile => {
                let count = self.chat.count_messages(&user.user_id).await?;
                vec![replies::profile(user, count)]
            }
            Command::Jobs => self.jobs().await?,
            Command::Unknown(_) => vec![replies::UNKNOWN_COMMAND.to_string()],
            Command::Survey | Command::Cancel => {
                return Err(DomainError::validation(
                    "command",
                    format!("{} is handled by the survey flow", command),
                ))
            }
        };
        Ok(out)
    }

    async fn jobs(&self) -> Result<Vec<String>, DomainError> {
        let jobs = self.chat.published_jobs(JOBS_LIMIT).await?;
        if jobs.is_empty() {
            return Ok(vec![replies::NO_JOBS.to_string()]);
        }

        let mut out = Vec::with_capacity(jobs.len() + 1);
        out.push(replies::JOBS_HEADER.to_string());
        for job in &jobs {
            self.chat.record_job_view(job.id).await?;
            out.push(job.card());
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryChatStore;
    use crate::domain::chat::{JobPosting, JobStatus, NewMessage, SalaryRange, UserProfile};
    use crate::domain::foundation::{JobId, Timestamp, UserId};

    mod parsing {
        use super::*;

        #[test]
        fn english_and_spanish_names() {
            assert_eq!(Command::parse("/start"), Some(Command::Start));
            assert_eq!(Command::parse("/ayuda"), Some(Command::Help));
            assert_eq!(Command::parse("/perfil"), Some(Command::Profile));
            assert_eq!(Command::parse("/ofertas"), Some(Command::Jobs));
            assert_eq!(Command::parse("/encuesta"), Some(Command::Survey));
            assert_eq!(Command::parse("/cancel"), Some(Command::Cancel));
        }

        #[test]
        fn ignores_bot_suffix_arguments_and_case() {
            assert_eq!(Command::parse("/Survey@RecruitBot now"), Some(Command::Survey));
            assert_eq!(Command::parse("  /jobs  "), Some(Command::Jobs));
        }

        #[test]
        fn plain_text_is_not_a_command() {
            assert_eq!(Command::parse("1"), None);
            assert_eq!(Command::parse("hello /start"), None);
        }

        #[test]
        fn unknown_keeps_its_name() {
            let command = Command::parse("/dance").unwrap();
            assert_eq!(command, Command::Unknown("dance".into()));
            assert_eq!(command.to_string(), "/dance");
        }
    }

    mod handling {
        use super::*;

        async fn user(store: &InMemoryChatStore) -> ChatUser {
            store
                .get_or_create_user(&UserProfile::new(UserId::from(5)).with_first_name("Ana"))
                .await
                .unwrap()
        }

        fn job(title: &str) -> JobPosting {
            JobPosting {
                id: JobId::new(),
                title: title.into(),
                company: "Acme".into(),
                location: "Remote".into(),
                description: "Build things".into(),
                salary: SalaryRange {
                    min: Some(1000),
                    max: None,
                    currency: "USD".into(),
                },
                status: JobStatus::Published,
                views_count: 0,
                created_at: Timestamp::now(),
            }
        }

        #[tokio::test]
        async fn start_greets_by_first_name() {
            let store = InMemoryChatStore::new();
            let handler = CommandHandler::new(Arc::new(store.clone()));

            let replies = handler.handle(&user(&store).await, &Command::Start).await.unwrap();

            assert!(replies[0].starts_with("Hello Ana!"));
        }

        #[tokio::test]
        async fn profile_counts_messages() {
            let store = InMemoryChatStore::new();
            let user = user(&store).await;
            for text in ["hi", "there"] {
                store
                    .record_message(NewMessage::incoming_text(user.user_id.clone(), text, None))
                    .await
                    .unwrap();
            }
            let handler = CommandHandler::new(Arc::new(store));

            let replies = handler.handle(&user, &Command::Profile).await.unwrap();

            assert!(replies[0].contains("User: @no_username"));
            assert!(replies[0].contains("Messages: 2"));
        }

        #[tokio::test]
        async fn jobs_lists_cards_and_counts_views() {
            let store = InMemoryChatStore::new();
            let posting = job("Backend Engineer");
            store.insert_job(posting.clone()).await;
            let handler = CommandHandler::new(Arc::new(store.clone()));

            let replies = handler.handle(&user(&store).await, &Command::Jobs).await.unwrap();

            assert_eq!(replies[0], replies::JOBS_HEADER);
            assert!(replies[1].contains("Backend Engineer"));
            assert!(replies[1].contains("From 1000 USD"));
            assert_eq!(store.job_views(posting.id).await, Some(1));
        }

        #[tokio::test]
        async fn no_jobs_message() {
            let store = InMemoryChatStore::new();
            let handler = CommandHandler::new(Arc::new(store.clone()));

            let replies = handler.handle(&user(&store).await, &Command::Jobs).await.unwrap();

            assert_eq!(replies, vec![replies::NO_JOBS.to_string()]);
        }

        #[tokio::test]
        async fn unknown_command_points_to_help() {
            let store = InMemoryChatStore::new();
            let handler = CommandHandler::new(Arc::new(store.clone()));

            let replies = handler
                .handle(&user(&store).await, &Command::Unknown("x".into()))
                .await
                .unwrap();

            assert_eq!(replies, vec![replies::UNKNOWN_COMMAND.to_string()]);
        }
    }
}
