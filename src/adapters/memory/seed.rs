//! YAML seed data for memory-backed runs.
//!
//! ```yaml
//! surveys:
//!   - title: Satisfaction
//!     description: Tell us how we are doing
//!     survey_type: other
//!     status: active
//!     questions:
//!       - text: Favourite perk?
//!         question_type: multiple
//!         order: 1
//!         options: [Remote work, Bonus, Training]
//!       - text: Rate your team
//!         question_type: rating
//!         order: 2
//! jobs:
//!   - title: Backend Engineer
//!     company: Acme
//!     location: Remote
//!     salary_min: 3000
//!     currency: USD
//! ```

use serde::Deserialize;
use std::path::Path;

use super::{InMemoryChatStore, InMemorySurveyStore};
use crate::domain::chat::{JobPosting, JobStatus, SalaryRange};
use crate::domain::foundation::{JobId, Timestamp, ValidationError};
use crate::domain::survey::{Question, QuestionType, Survey, SurveyOption, SurveyStatus, SurveyType};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse seed file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid seed data: {0}")]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub surveys: Vec<SurveySeed>,
    #[serde(default)]
    pub jobs: Vec<JobSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveySeed {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_survey_type")]
    pub survey_type: String,
    #[serde(default = "default_survey_status")]
    pub status: String,
    #[serde(default)]
    pub questions: Vec<QuestionSeed>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionSeed {
    pub text: String,
    pub question_type: String,
    pub order: Option<i32>,
    #[serde(default = "default_required")]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobSeed {
    pub title: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_survey_type() -> String {
    "other".to_string()
}

fn default_survey_status() -> String {
    "active".to_string()
}

fn default_required() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}

/// Counts of what a seed inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    pub surveys: usize,
    pub questions: usize,
    pub jobs: usize,
}

impl SeedData {
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SeedError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SeedError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Inserts into the stores. Each survey is fully validated before any of
    /// its rows are written.
    pub async fn apply(
        &self,
        surveys: &InMemorySurveyStore,
        chat: &InMemoryChatStore,
    ) -> Result<SeedSummary, SeedError> {
        let mut summary = SeedSummary::default();

        for seed in &self.surveys {
            let survey = Survey::new(
                seed.title.clone(),
                seed.description.clone(),
                seed.survey_type.parse::<SurveyType>()?,
            )?
            .with_status(seed.status.parse::<SurveyStatus>()?);

            let mut questions = Vec::with_capacity(seed.questions.len());
            for q in &seed.questions {
                let question_type = q.question_type.parse::<QuestionType>()?;
                let mut question = Question::new(survey.id, q.text.clone(), question_type, 0);
                question.order = q.order;
                question.is_required = q.required;
                let options: Vec<SurveyOption> = q
                    .options
                    .iter()
                    .enumerate()
                    .map(|(idx, text)| SurveyOption::new(question.id, text.clone(), idx as i32 + 1))
                    .collect();
                questions.push((question, options));
            }

            surveys.insert_survey(survey).await;
            summary.surveys += 1;
            for (question, options) in questions {
                surveys.insert_question(question).await;
                summary.questions += 1;
                for option in options {
                    surveys.insert_option(option).await;
                }
            }
        }

        for seed in &self.jobs {
            if seed.title.trim().is_empty() {
                return Err(ValidationError::empty_field("job.title").into());
            }
            chat.insert_job(JobPosting {
                id: JobId::new(),
                title: seed.title.clone(),
                company: seed.company.clone(),
                location: seed.location.clone(),
                description: seed.description.clone(),
                salary: SalaryRange {
                    min: seed.salary_min,
                    max: seed.salary_max,
                    currency: seed.currency.clone(),
                },
                status: JobStatus::Published,
                views_count: 0,
                created_at: Timestamp::now(),
            })
            .await;
            summary.jobs += 1;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ChatRepository, SurveyReader};
    use std::io::Write;

    const SEED: &str = r#"
surveys:
  - title: Satisfaction
    description: How are we doing?
    questions:
      - text: Favourite perk?
        question_type: multiple
        order: 1
        options: [Remote work, Bonus, Training]
      - text: Rate your team
        question_type: rating
        order: 2
        required: false
  - title: Old survey
    status: closed
jobs:
  - title: Backend Engineer
    company: Acme
    location: Remote
    salary_min: 3000
    salary_max: 4500
"#;

    #[tokio::test]
    async fn seed_file_populates_stores() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SEED.as_bytes()).unwrap();

        let seed = SeedData::load(file.path()).unwrap();
        let surveys = InMemorySurveyStore::new();
        let chat = InMemoryChatStore::new();
        let summary = seed.apply(&surveys, &chat).await.unwrap();

        assert_eq!(
            summary,
            SeedSummary {
                surveys: 2,
                questions: 2,
                jobs: 1
            }
        );

        let active = surveys.active_surveys(5).await.unwrap();
        assert_eq!(active.len(), 1);
        let first = surveys
            .first_question_after(active[0].id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.question_type, QuestionType::MultipleChoice);
        let options = surveys.options_for(first.id).await.unwrap();
        assert_eq!(options[2].text, "Training");

        let jobs = chat.published_jobs(5).await.unwrap();
        assert_eq!(jobs[0].salary.to_string(), "3000 - 4500 USD");
    }

    #[tokio::test]
    async fn unknown_question_type_is_rejected() {
        let yaml = r#"
surveys:
  - title: Broken
    questions:
      - text: Slide me
        question_type: slider
        order: 1
"#;
        let seed = SeedData::from_yaml_str(yaml).unwrap();
        let result = seed
            .apply(&InMemorySurveyStore::new(), &InMemoryChatStore::new())
            .await;
        assert!(matches!(result, Err(SeedError::Invalid(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = SeedData::load(dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(SeedError::Io(_))));
    }
}
