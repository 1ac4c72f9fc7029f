//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Declares a UUID-backed identifier with the usual constructors and conversions.
macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates the identifier from an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a survey.
    SurveyId
);

uuid_id!(
    /// Unique identifier for a survey question.
    QuestionId
);

uuid_id!(
    /// Unique identifier for a multiple-choice option.
    OptionId
);

uuid_id!(
    /// Unique identifier for one user's response to a survey.
    ResponseId
);

uuid_id!(
    /// Unique identifier for a single recorded answer.
    AnswerId
);

uuid_id!(
    /// Unique identifier for an audited chat message.
    MessageId
);

uuid_id!(
    /// Unique identifier for a job posting.
    JobId
);

/// External chat user identifier (the Telegram user id, kept as text).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn survey_id_generates_unique_values() {
        let id1 = SurveyId::new();
        let id2 = SurveyId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn question_id_parses_from_valid_string() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: QuestionId = uuid_str.parse().unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn option_id_rejects_invalid_string() {
        assert!("not-a-uuid".parse::<OptionId>().is_err());
    }

    #[test]
    fn response_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = ResponseId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn survey_id_serializes_transparently() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let id: SurveyId = uuid_str.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", uuid_str));
    }

    #[test]
    fn user_id_accepts_non_empty_string() {
        let id = UserId::new("123456789").unwrap();
        assert_eq!(id.as_str(), "123456789");
    }

    #[test]
    fn user_id_rejects_blank_string() {
        assert!(UserId::new("").is_err());
        assert!(UserId::new("   ").is_err());
    }

    #[test]
    fn user_id_from_telegram_integer() {
        let id = UserId::from(987654321_i64);
        assert_eq!(id.to_string(), "987654321");
    }
}
