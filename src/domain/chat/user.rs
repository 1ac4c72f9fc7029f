//! Chat users and the profile data the transport reports for them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};

/// Username stored when the transport reports none.
pub const DEFAULT_USERNAME: &str = "no_username";

/// First name stored when the transport reports none.
pub const DEFAULT_FIRST_NAME: &str = "User";

/// Profile as reported by the transport with each inbound update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserProfile {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            username: None,
            first_name: None,
            last_name: None,
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    /// Username with the storage default applied.
    pub fn username_or_default(&self) -> &str {
        non_blank(self.username.as_deref()).unwrap_or(DEFAULT_USERNAME)
    }

    /// First name with the storage default applied.
    pub fn first_name_or_default(&self) -> &str {
        non_blank(self.first_name.as_deref()).unwrap_or(DEFAULT_FIRST_NAME)
    }

    pub fn last_name_or_default(&self) -> &str {
        non_blank(self.last_name.as_deref()).unwrap_or("")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// A stored chat user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatUser {
    pub user_id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
}

impl ChatUser {
    /// Builds a new user from a transport profile, applying defaults.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.user_id.clone(),
            username: profile.username_or_default().to_string(),
            first_name: profile.first_name_or_default().to_string(),
            last_name: profile.last_name_or_default().to_string(),
            is_active: true,
            created_at: Timestamp::now(),
        }
    }

    /// Returns true if the stored username or first name differs from the
    /// profile after defaults are applied.
    pub fn is_stale(&self, profile: &UserProfile) -> bool {
        self.username != profile.username_or_default()
            || self.first_name != profile.first_name_or_default()
    }

    /// Copies the profile's names onto this user. Returns true if anything
    /// changed.
    pub fn refresh_from(&mut self, profile: &UserProfile) -> bool {
        if !self.is_stale(profile) {
            return false;
        }
        self.username = profile.username_or_default().to_string();
        self.first_name = profile.first_name_or_default().to_string();
        self.last_name = profile.last_name_or_default().to_string();
        true
    }
}
