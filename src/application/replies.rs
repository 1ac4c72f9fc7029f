//! User-facing reply texts.

use crate::domain::chat::ChatUser;
use crate::domain::foundation::Timestamp;
use crate::domain::survey::{InputRejection, Survey};

/// Characters of a survey description shown in the menu.
const MENU_DESCRIPTION_CHARS: usize = 50;

pub const HELP: &str = "🤖 How can I help?\n\n\
Commands:\n\
/start - Welcome message\n\
/jobs - Latest job offers\n\
/survey - Answer a survey\n\
/profile - Your profile\n\
/cancel - Leave the current survey\n\
/help - This help\n\n\
You can also write me any question about jobs, interviews or your career.";

pub const UNKNOWN_COMMAND: &str = "I don't know that command. Type /help to see what I can do.";

pub const CANCELLED: &str = "Survey cancelled. You are back in free chat.";

pub const NOTHING_TO_CANCEL: &str = "There is nothing to cancel.";

pub const NO_JOBS: &str = "No job offers available right now.";

pub const JOBS_HEADER: &str = "📋 Latest Job Offers:";

pub const NO_SURVEYS: &str =
    "There are no surveys available right now.\nCome back soon to take part in our surveys.";

pub const INVALID_SELECTION: &str = "Invalid option. Try again with the survey number.";

pub const NO_QUESTIONS: &str = "This survey has no questions configured.";

pub const AI_EMPTY_FALLBACK: &str = "I couldn't generate a response. Please try again.";

pub const AI_FAILURE: &str =
    "Sorry, I'm having trouble answering right now. Please try again in a moment.";

pub const PROCESSING_ERROR: &str = "Error processing your request. Please try again.";

pub fn welcome(first_name: &str) -> String {
    format!(
        "Hello {}! 👋\n\n\
         I'm your recruitment assistant. I can help you with:\n\
         • Finding job offers (/jobs)\n\
         • Answering surveys (/survey)\n\
         • Questions about interviews and your career\n\n\
         Type /help to see every command, or just write me a message.",
        first_name
    )
}

pub fn profile(user: &ChatUser, message_count: u64) -> String {
    format!(
        "👤 Your Profile\n\n\
         User: @{}\n\
         Name: {}\n\
         Messages: {}\n\
         Member since: {}",
        user.username,
        user.first_name,
        message_count,
        user.created_at.format_day()
    )
}

pub fn survey_menu(surveys: &[Survey]) -> String {
    let mut text = String::from("📊 Available Surveys:\n\n");
    for (idx, survey) in surveys.iter().enumerate() {
        text.push_str(&format!(
            "{}. {}\n   {}...\n\n",
            idx + 1,
            survey.title,
            survey.description_preview(MENU_DESCRIPTION_CHARS)
        ));
    }
    text.push_str("Write the number of the survey you want to answer.");
    text
}

pub fn already_answered(survey: &Survey, completed_at: Timestamp) -> String {
    format!(
        "You already answered the survey '{}' on {}.",
        survey.title,
        completed_at.format_day_minute()
    )
}

pub fn survey_completed(survey: &Survey) -> String {
    format!(
        "✅ Thank you for answering the survey '{}'!\n\nYour answers have been recorded successfully.",
        survey.title
    )
}

/// Corrective prompt for rejected input. The question is not repeated.
pub fn rejection(reason: InputRejection) -> &'static str {
    match reason {
        InputRejection::UnknownOption => "Invalid option. Try again.",
        InputRejection::NotYesNo => "Write 1 for Yes or 2 for No.",
        InputRejection::NotARating => "Write a number from 1 to 5.",
        InputRejection::EmptyText => "Please write your answer.",
    }
}
