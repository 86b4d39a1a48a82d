use thiserror::Error;

use crate::model::ids::{OptionId, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("question needs at least two options, got {0}")]
    TooFewOptions(usize),

    #[error("duplicate option id: {0}")]
    DuplicateOptionId(OptionId),

    #[error("option {0} has an empty label")]
    EmptyOptionLabel(OptionId),

    #[error("correct option {0} is not among the question's options")]
    UnknownCorrectOption(OptionId),
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// One selectable answer for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    id: OptionId,
    label: String,
}

impl QuestionOption {
    #[must_use]
    pub fn new(id: OptionId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> OptionId {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Immutable once constructed.
///
/// `correct_option` exists only so the local scorer can grade answers in
/// this mock design. A deployment with a real backend must keep the key
/// server-side and construct questions with `correct_option = None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<QuestionOption>,
    correct_option: Option<OptionId>,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` for a blank prompt,
    /// `QuestionError::TooFewOptions` for fewer than two options,
    /// `QuestionError::DuplicateOptionId` / `QuestionError::EmptyOptionLabel`
    /// for malformed options, and `QuestionError::UnknownCorrectOption` when
    /// the answer key names no option.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<QuestionOption>,
        correct_option: Option<OptionId>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions(options.len()));
        }

        let mut seen = std::collections::HashSet::new();
        for option in &options {
            if option.label.trim().is_empty() {
                return Err(QuestionError::EmptyOptionLabel(option.id));
            }
            if !seen.insert(option.id) {
                return Err(QuestionError::DuplicateOptionId(option.id));
            }
        }

        if let Some(key) = correct_option {
            if !seen.contains(&key) {
                return Err(QuestionError::UnknownCorrectOption(key));
            }
        }

        Ok(Self {
            id,
            prompt,
            options,
            correct_option,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Options in their display order.
    #[must_use]
    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> Option<OptionId> {
        self.correct_option
    }

    /// Returns true when `id` names one of this question's options.
    #[must_use]
    pub fn has_option(&self, id: OptionId) -> bool {
        self.options.iter().any(|option| option.id == id)
    }

    #[must_use]
    pub fn option(&self, id: OptionId) -> Option<&QuestionOption> {
        self.options.iter().find(|option| option.id == id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<QuestionOption> {
        vec![
            QuestionOption::new(OptionId::new(1), "3"),
            QuestionOption::new(OptionId::new(2), "4"),
            QuestionOption::new(OptionId::new(3), "5"),
            QuestionOption::new(OptionId::new(4), "22"),
        ]
    }

    #[test]
    fn builds_a_valid_question() {
        let question = Question::new(
            QuestionId::new(1),
            "What is 2 + 2?",
            options(),
            Some(OptionId::new(2)),
        )
        .unwrap();

        assert_eq!(question.id(), QuestionId::new(1));
        assert_eq!(question.options().len(), 4);
        assert_eq!(question.correct_option(), Some(OptionId::new(2)));
        assert!(question.has_option(OptionId::new(4)));
        assert!(!question.has_option(OptionId::new(9)));
        assert_eq!(question.option(OptionId::new(2)).unwrap().label(), "4");
    }

    #[test]
    fn rejects_empty_prompt() {
        let err = Question::new(QuestionId::new(1), "  ", options(), None).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new(
            QuestionId::new(1),
            "Pick one",
            vec![QuestionOption::new(OptionId::new(1), "only")],
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions(1));
    }

    #[test]
    fn rejects_duplicate_option_ids() {
        let err = Question::new(
            QuestionId::new(1),
            "Pick one",
            vec![
                QuestionOption::new(OptionId::new(1), "a"),
                QuestionOption::new(OptionId::new(1), "b"),
            ],
            None,
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOptionId(OptionId::new(1)));
    }

    #[test]
    fn rejects_correct_option_outside_the_set() {
        let err = Question::new(
            QuestionId::new(1),
            "What is 2 + 2?",
            options(),
            Some(OptionId::new(9)),
        )
        .unwrap_err();
        assert_eq!(err, QuestionError::UnknownCorrectOption(OptionId::new(9)));
    }

    #[test]
    fn allows_a_question_without_an_answer_key() {
        let question =
            Question::new(QuestionId::new(1), "What is 2 + 2?", options(), None).unwrap();
        assert_eq!(question.correct_option(), None);
    }
}
