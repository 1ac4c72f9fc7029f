//! Rating value object for survey rating questions (1 to 5 stars).

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// Star rating given to a rating question: 1 (lowest) to 5 (highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i16", into = "i16")]
pub struct Rating(u8);

impl Rating {
    /// Lowest accepted rating.
    pub const MIN: i16 = 1;
    /// Highest accepted rating.
    pub const MAX: i16 = 5;

    /// Creates a Rating from an integer, returning error if out of range.
    pub fn try_new(value: i16) -> Result<Self, ValidationError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(ValidationError::out_of_range(
                "rating",
                Self::MIN as i32,
                Self::MAX as i32,
                value as i32,
            ));
        }
        Ok(Self(value as u8))
    }

    /// Returns the numeric value.
    pub fn value(&self) -> i16 {
        self.0 as i16
    }
}

impl TryFrom<i16> for Rating {
    type Error = ValidationError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<Rating> for i16 {
    fn from(rating: Rating) -> Self {
        rating.value()
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_one_through_five() {
        for value in 1..=5 {
            assert_eq!(Rating::try_new(value).unwrap().value(), value);
        }
    }

    #[test]
    fn rejects_values_outside_range() {
        assert!(Rating::try_new(0).is_err());
        assert!(Rating::try_new(6).is_err());
        assert!(Rating::try_new(-3).is_err());
    }

    #[test]
    fn deserializing_out_of_range_fails() {
        assert!(serde_json::from_str::<Rating>("4").is_ok());
        assert!(serde_json::from_str::<Rating>("9").is_err());
    }
}
