//! Survey aggregate root and its classification enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{SurveyId, Timestamp, ValidationError};

/// Publication status of a survey.
///
/// Only `Active` surveys are ever offered to chat users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    #[default]
    Draft,
    Active,
    Closed,
}

impl SurveyStatus {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyStatus::Draft => "draft",
            SurveyStatus::Active => "active",
            SurveyStatus::Closed => "closed",
        }
    }
}

impl FromStr for SurveyStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SurveyStatus::Draft),
            "active" => Ok(SurveyStatus::Active),
            "closed" => Ok(SurveyStatus::Closed),
            other => Err(ValidationError::invalid_format(
                "survey_status",
                format!("unknown status '{}'", other),
            )),
        }
    }
}

/// Topic of a survey, used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SurveyType {
    Salary,
    Events,
    Wellness,
    #[default]
    Other,
}

impl SurveyType {
    /// Storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyType::Salary => "salary",
            SurveyType::Events => "events",
            SurveyType::Wellness => "wellness",
            SurveyType::Other => "other",
        }
    }
}

impl FromStr for SurveyType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "salary" => Ok(SurveyType::Salary),
            "events" => Ok(SurveyType::Events),
            "wellness" => Ok(SurveyType::Wellness),
            "other" => Ok(SurveyType::Other),
            other => Err(ValidationError::invalid_format(
                "survey_type",
                format!("unknown type '{}'", other),
            )),
        }
    }
}

impl fmt::Display for SurveyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named set of questions offered to chat users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Survey {
    pub id: SurveyId,
    pub title: String,
    pub description: String,
    pub survey_type: SurveyType,
    pub status: SurveyStatus,
    pub created_at: Timestamp,
    pub expires_at: Option<Timestamp>,
}

impl Survey {
    /// Creates a draft survey, rejecting a blank title.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        survey_type: SurveyType,
    ) -> Result<Self, ValidationError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title"));
        }
        Ok(Self {
            id: SurveyId::new(),
            title,
            description: description.into(),
            survey_type,
            status: SurveyStatus::Draft,
            created_at: Timestamp::now(),
            expires_at: None,
        })
    }

    /// Sets the status (builder style, used when loading fixtures).
    pub fn with_status(mut self, status: SurveyStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns true if the survey may be offered to users.
    pub fn is_offered(&self) -> bool {
        self.status == SurveyStatus::Active
    }

    /// First `max_chars` characters of the description, for menus.
    pub fn description_preview(&self, max_chars: usize) -> String {
        self.description.chars().take(max_chars).collect()
    }
}
