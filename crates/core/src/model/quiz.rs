use thiserror::Error;

use crate::model::ids::{QuestionId, QuizId};
use crate::model::question::Question;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz subject cannot be empty")]
    EmptySubject,

    #[error("quiz time limit must be > 0 minutes")]
    InvalidTimeLimit,

    #[error("quiz needs at least one question")]
    NoQuestions,

    #[error("duplicate question id: {0}")]
    DuplicateQuestionId(QuestionId),
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered set of questions with a title, subject, and time limit.
///
/// Immutable once loaded: a session takes the quiz at start and drops it
/// when the session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    subject: String,
    time_limit_minutes: u32,
    questions: Vec<Question>,
}

impl Quiz {
    /// Build a validated quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyTitle` / `QuizError::EmptySubject` for blank
    /// metadata, `QuizError::InvalidTimeLimit` for a zero time limit,
    /// `QuizError::NoQuestions` for an empty question list, and
    /// `QuizError::DuplicateQuestionId` when two questions share an id.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        subject: impl Into<String>,
        time_limit_minutes: u32,
        questions: Vec<Question>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        let subject = subject.into();

        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if subject.trim().is_empty() {
            return Err(QuizError::EmptySubject);
        }
        if time_limit_minutes == 0 {
            return Err(QuizError::InvalidTimeLimit);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }

        let mut seen = std::collections::HashSet::new();
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuizError::DuplicateQuestionId(question.id()));
            }
        }

        Ok(Self {
            id,
            title,
            subject,
            time_limit_minutes,
            questions,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn time_limit_minutes(&self) -> u32 {
        self.time_limit_minutes
    }

    /// Time limit in seconds, the unit the countdown runs in.
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_minutes * 60
    }

    /// Questions in presentation order.
    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|question| question.id() == id)
    }

    #[must_use]
    pub fn question_at(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn contains_question(&self, id: QuestionId) -> bool {
        self.question(id).is_some()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
