//! QuestionPresenter - Renders a question and the answer shape it expects.

use crate::domain::foundation::DomainError;
use crate::domain::survey::{ExpectedAnswer, Question, QuestionType, Survey, SurveyOption};

use super::SurveyCatalog;

/// A question ready to send, plus what the session should expect next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedQuestion {
    pub text: String,
    pub expected: ExpectedAnswer,
}

#[derive(Clone)]
pub struct QuestionPresenter {
    catalog: SurveyCatalog,
}

impl QuestionPresenter {
    pub fn new(catalog: SurveyCatalog) -> Self {
        Self { catalog }
    }

    /// Renders `question` as the `position`-th (zero-based) question shown.
    pub async fn render(
        &self,
        survey: &Survey,
        question: &Question,
        position: u32,
    ) -> Result<RenderedQuestion, DomainError> {
        let total = self.catalog.total_questions(survey.id).await?;

        let options = match question.question_type {
            QuestionType::MultipleChoice => {
                let options = self.catalog.options(question.id).await?;
                if options.is_empty() {
                    tracing::warn!(
                        survey_id = %survey.id,
                        question_id = %question.id,
                        "Multiple-choice question has no options"
                    );
                }
                options
            }
            _ => Vec::new(),
        };

        Ok(format_question(question, position, total, &options))
    }
}

/// Pure rendering step, separated for testing.
pub fn format_question(
    question: &Question,
    position: u32,
    total: u32,
    options: &[SurveyOption],
) -> RenderedQuestion {
    let mut text = format!("📋 Question {}/{}\n\n{}", position + 1, total, question.text);
    if question.is_required {
        text.push_str(" *");
    }

    let expected = match question.question_type {
        QuestionType::MultipleChoice => {
            text.push_str("\n\n");
            for (idx, option) in options.iter().enumerate() {
                text.push_str(&format!("{}. {}\n", idx + 1, option.text));
            }
            text.push_str("\nWrite the number of your option:");
            ExpectedAnswer::multiple_choice(options)
        }
        QuestionType::YesNo => {
            text.push_str("\n\n1. Yes\n2. No");
            ExpectedAnswer::YesNo
        }
        QuestionType::Rating => {
            text.push_str("\n\n1 ⭐ 2 ⭐ 3 ⭐ 4 ⭐ 5 ⭐\n\nWrite a number from 1 to 5:");
            ExpectedAnswer::Rating
        }
        QuestionType::FreeText => {
            text.push_str("\n\nWrite your answer:");
            ExpectedAnswer::FreeText
        }
    };

    RenderedQuestion { text, expected }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SurveyId;

    fn question(question_type: QuestionType) -> Question {
        Question::new(SurveyId::new(), "How was onboarding?", question_type, 1)
    }

    mod headers {
        use super::*;

        #[test]
        fn numbers_from_position_and_total() {
            let rendered = format_question(&question(QuestionType::FreeText), 2, 5, &[]);
            assert!(rendered.text.starts_with("📋 Question 3/5\n\nHow was onboarding? *"));
        }

        #[test]
        fn optional_question_has_no_marker() {
            let rendered = format_question(&question(QuestionType::FreeText).optional(), 0, 1, &[]);
            assert!(rendered.text.contains("How was onboarding?\n\n"));
            assert!(!rendered.text.contains(" *"));
        }
    }

    mod shapes {
        use super::*;

        #[test]
        fn multiple_choice_lists_options_and_maps_keys() {
            let q = question(QuestionType::MultipleChoice);
            let options = vec![
                SurveyOption::new(q.id, "Remote", 1),
                SurveyOption::new(q.id, "Hybrid", 2),
            ];

            let rendered = format_question(&q, 0, 1, &options);

            assert!(rendered
                .text
                .ends_with("\n\n1. Remote\n2. Hybrid\n\nWrite the number of your option:"));
            match rendered.expected {
                ExpectedAnswer::MultipleChoice { options: map } => {
                    assert_eq!(map.get("1"), Some(&options[0].id));
                    assert_eq!(map.get("2"), Some(&options[1].id));
                    assert_eq!(map.len(), 2);
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        #[test]
        fn yes_no_offers_two_choices() {
            let rendered = format_question(&question(QuestionType::YesNo), 0, 1, &[]);
            assert!(rendered.text.ends_with("\n\n1. Yes\n2. No"));
            assert_eq!(rendered.expected, ExpectedAnswer::YesNo);
        }

        #[test]
        fn rating_shows_scale() {
            let rendered = format_question(&question(QuestionType::Rating), 0, 1, &[]);
            assert!(rendered.text.contains("1 ⭐ 2 ⭐ 3 ⭐ 4 ⭐ 5 ⭐"));
            assert_eq!(rendered.expected, ExpectedAnswer::Rating);
        }

        #[test]
        fn free_text_asks_for_answer() {
            let rendered = format_question(&question(QuestionType::FreeText), 0, 1, &[]);
            assert!(rendered.text.ends_with("Write your answer:"));
            assert_eq!(rendered.expected, ExpectedAnswer::FreeText);
        }
    }
}
