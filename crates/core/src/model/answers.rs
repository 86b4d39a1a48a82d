use std::collections::HashMap;

use crate::model::ids::{OptionId, QuestionId};
use crate::model::quiz::Quiz;

/// The record of which option a user selected per question.
///
/// Keys are unique and insertion order is irrelevant. The map only grows
/// while a session is in progress; a new session starts from an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerMap {
    selections: HashMap<QuestionId, OptionId>,
}

impl AnswerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a selection, overwriting any previous one for the question.
    ///
    /// Returns the replaced selection, so re-selecting the same option is
    /// observably a no-op.
    pub fn select(&mut self, question: QuestionId, option: OptionId) -> Option<OptionId> {
        self.selections.insert(question, option)
    }

    #[must_use]
    pub fn selected(&self, question: QuestionId) -> Option<OptionId> {
        self.selections.get(&question).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Returns true when every question in `quiz` has a selection.
    #[must_use]
    pub fn covers(&self, quiz: &Quiz) -> bool {
        self.missing_count(quiz) == 0
    }

    /// Number of quiz questions without a selection.
    #[must_use]
    pub fn missing_count(&self, quiz: &Quiz) -> usize {
        quiz.questions()
            .iter()
            .filter(|question| !self.selections.contains_key(&question.id()))
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (QuestionId, OptionId)> + '_ {
        self.selections.iter().map(|(q, o)| (*q, *o))
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
