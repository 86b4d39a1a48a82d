//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{OptionId, QuestionId, QuizResultError};
use storage::repository::StorageError;

/// Errors emitted by the quiz session state machine and its workflow.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The session already transitioned to `Submitted`; mutating
    /// operations are no longer legal.
    #[error("session already submitted")]
    AlreadySubmitted,

    /// The session has not been submitted, so there is no result yet.
    #[error("session not submitted yet")]
    NotSubmitted,

    #[error("question {0} does not belong to this quiz")]
    UnknownQuestion(QuestionId),

    #[error("option {option} does not belong to question {question}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },

    /// Manual submission requires an answer for every question.
    #[error("quiz is incomplete: {missing} unanswered question(s)")]
    Incomplete { missing: usize },

    #[error("question index {index} out of range for {total} questions")]
    IndexOutOfRange { index: usize, total: usize },

    #[error(transparent)]
    Result(#[from] QuizResultError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountError {
    #[error("an account with this email already exists")]
    EmailTaken,

    /// Covers both an unknown email and a mismatched secret; callers
    /// get one uniform answer.
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
