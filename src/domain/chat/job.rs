//! Published job postings shown to chat users and fed to the AI as context.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{JobId, Timestamp};

/// Characters of a description shown in a job card.
pub const DESCRIPTION_PREVIEW_CHARS: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    Draft,
    Published,
    Closed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Draft => "draft",
            JobStatus::Published => "published",
            JobStatus::Closed => "closed",
        }
    }
}

/// Offered salary. Either bound may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
    pub currency: String,
}

impl fmt::Display for SalaryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) => write!(f, "{} - {} {}", min, max, self.currency),
            (Some(min), None) => write!(f, "From {} {}", min, self.currency),
            (None, Some(max)) => write!(f, "Up to {} {}", max, self.currency),
            (None, None) => f.write_str("Not specified"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobPosting {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub salary: SalaryRange,
    pub status: JobStatus,
    pub views_count: i64,
    pub created_at: Timestamp,
}

impl JobPosting {
    pub fn is_published(&self) -> bool {
        self.status == JobStatus::Published
    }

    /// Plain-text card sent for `/jobs`.
    pub fn card(&self) -> String {
        let preview: String = self
            .description
            .chars()
            .take(DESCRIPTION_PREVIEW_CHARS)
            .collect();
        format!(
            "Title: {}\nCompany: {}\n\nLocation: {}\nSalary: {}\n\nDescription:\n{}...",
            self.title, self.company, self.location, self.salary, preview
        )
    }

    /// One-line summary used in AI prompts.
    pub fn summary_line(&self) -> String {
        format!("• {} at {} - {}", self.title, self.company, self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn salary(min: Option<i64>, max: Option<i64>) -> SalaryRange {
        SalaryRange {
            min,
            max,
            currency: "USD".to_string(),
        }
    }

    fn job(description: &str) -> JobPosting {
        JobPosting {
            id: JobId::new(),
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: description.to_string(),
            salary: salary(Some(3000), Some(4500)),
            status: JobStatus::Published,
            views_count: 0,
            created_at: Timestamp::now(),
        }
    }

    #[test]
    fn salary_range_formats_every_bound_combination() {
        assert_eq!(salary(Some(1), Some(2)).to_string(), "1 - 2 USD");
        assert_eq!(salary(Some(1), None).to_string(), "From 1 USD");
        assert_eq!(salary(None, Some(2)).to_string(), "Up to 2 USD");
        assert_eq!(salary(None, None).to_string(), "Not specified");
    }

    #[test]
    fn card_truncates_description() {
        let long = "x".repeat(400);
        let card = job(&long).card();
        assert!(card.ends_with(&format!("{}...", "x".repeat(150))));
        assert!(!card.contains(&"x".repeat(151)));
        assert!(card.contains("Salary: 3000 - 4500 USD"));
    }

    #[test]
    fn summary_line_names_title_company_and_location() {
        assert_eq!(job("").summary_line(), "• Backend Engineer at Acme - Remote");
    }
}
