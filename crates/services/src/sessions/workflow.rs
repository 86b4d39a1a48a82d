use std::sync::Arc;

use quiz_core::model::{OptionId, QuestionId, QuizId, QuizResult, UserId};
use storage::repository::{QuizRepository, ResultId, ResultRepository, StorageError};

use super::session::QuizSession;
use crate::Clock;
use crate::error::SessionError;

/// Outcome of a submission, manual or forced, including where it landed
/// in storage.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSubmitOutcome {
    pub result: QuizResult,
    pub result_id: ResultId,
}

/// Orchestrates session start, countdown, and persisted submission.
///
/// The session machine itself is synchronous; this service is the async
/// boundary that loads quizzes from storage and appends scored results.
#[derive(Clone)]
pub struct SessionFlowService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn ResultRepository>,
}

impl SessionFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn ResultRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            results,
        }
    }

    /// Start a new session for the given quiz.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` with `StorageError::NotFound` when
    /// the quiz id is unknown, or other storage failures.
    pub async fn start_session(&self, quiz_id: QuizId) -> Result<QuizSession, SessionError> {
        let quiz = self
            .quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or(StorageError::NotFound)?;
        Ok(QuizSession::new(quiz, self.clock.now()))
    }

    /// Record an answer selection. Pure passthrough; listed here so the
    /// presentation layer talks to one service for every session mutation.
    ///
    /// # Errors
    ///
    /// Propagates the session's validation errors.
    pub fn select_answer(
        &self,
        session: &mut QuizSession,
        question: QuestionId,
        option: OptionId,
    ) -> Result<(), SessionError> {
        session.select_answer(question, option)
    }

    /// Submit manually and persist the scored result for `user`.
    ///
    /// # Errors
    ///
    /// Returns the session's submission errors, or `SessionError::Storage`
    /// when the append fails (the session stays submitted; retry with
    /// `finalize_result`).
    pub async fn submit(
        &self,
        session: &mut QuizSession,
        user: UserId,
    ) -> Result<SessionSubmitOutcome, SessionError> {
        let result = session.submit(self.clock.now())?.clone();
        let result_id = self.results.append_result(user, &result).await?;
        session.set_result_id(result_id);
        Ok(SessionSubmitOutcome { result, result_id })
    }

    /// Drive the countdown by one second.
    ///
    /// When this tick drains the countdown the session force-submits and
    /// the result is persisted exactly as in `submit`; `None` means the
    /// session is still in progress (or already submitted).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` when persisting a forced result
    /// fails; the session stays submitted and `finalize_result` can retry.
    pub async fn tick(
        &self,
        session: &mut QuizSession,
        user: UserId,
    ) -> Result<Option<SessionSubmitOutcome>, SessionError> {
        let Some(result) = session.tick(self.clock.now()).cloned() else {
            return Ok(None);
        };

        let result_id = self.results.append_result(user, &result).await?;
        session.set_result_id(result_id);
        Ok(Some(SessionSubmitOutcome { result, result_id }))
    }

    /// Retry result persistence for a submitted session.
    ///
    /// Useful when the append in `submit` or `tick` failed on a transient
    /// storage error. Idempotent: an already-persisted result returns its
    /// existing id.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotSubmitted` when the session has no result
    /// to persist yet, or `SessionError::Storage` if the append fails again.
    pub async fn finalize_result(
        &self,
        session: &mut QuizSession,
        user: UserId,
    ) -> Result<ResultId, SessionError> {
        if let Some(id) = session.result_id() {
            return Ok(id);
        }

        let Some(result) = session.result().cloned() else {
            return Err(SessionError::NotSubmitted);
        };

        let id = self.results.append_result(user, &result).await?;
        session.set_result_id(id);
        Ok(id)
    }
}
