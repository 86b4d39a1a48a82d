use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{
    AnswerMap, OptionId, Question, QuestionId, Quiz, QuizResult, SubmissionKind,
};
use storage::repository::ResultId;

use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One user's attempt at a single quiz.
///
/// Owns the loaded quiz, the answer map, the cursor over questions, and
/// the countdown. Two states: in progress, then submitted (terminal); the
/// transition happens exactly once, via `submit` or a tick that drains the
/// countdown. Timestamps are injected by the caller so the services layer
/// clock stays the single time source.
///
/// Every mutating operation validates before it touches state: a rejected
/// call leaves the session observably unchanged.
pub struct QuizSession {
    quiz: Quiz,
    current: usize,
    answers: AnswerMap,
    remaining_secs: u32,
    started_at: DateTime<Utc>,
    result: Option<QuizResult>,
    result_id: Option<ResultId>,
}

impl QuizSession {
    /// Open a session over a validated quiz.
    ///
    /// Quiz validation already guarantees at least one question and a
    /// positive time limit, so construction cannot fail.
    #[must_use]
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Self {
        let remaining_secs = quiz.time_limit_secs();
        Self {
            quiz,
            current: 0,
            answers: AnswerMap::new(),
            remaining_secs,
            started_at,
            result: None,
            result_id: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Index of the question currently in front of the user.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // The index invariant `current < total_questions` holds from
        // construction onward; navigation clamps keep it true.
        &self.quiz.questions()[self.current]
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    #[must_use]
    pub fn is_answered(&self, question: QuestionId) -> bool {
        self.answers.selected(question).is_some()
    }

    /// Seconds left on the countdown.
    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.result.is_some()
    }

    /// The scored outcome, present once the session is submitted.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    /// Storage id of the persisted result, once the workflow stored it.
    #[must_use]
    pub fn result_id(&self) -> Option<ResultId> {
        self.result_id
    }

    /// Snapshot of completion and countdown state.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let total = self.quiz.total_questions();
        let answered = self.answers.len();
        SessionProgress {
            total,
            answered,
            unanswered: total.saturating_sub(answered),
            current_index: self.current,
            remaining_secs: self.remaining_secs,
            is_submitted: self.is_submitted(),
        }
    }

    pub(crate) fn set_result_id(&mut self, id: ResultId) {
        self.result_id = Some(id);
    }

    /// Record the user's selection for a question.
    ///
    /// Inserts or overwrites the answer map entry; re-selecting the same
    /// option is observably a no-op.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` after submission,
    /// `SessionError::UnknownQuestion` when the question is not part of
    /// this quiz, and `SessionError::UnknownOption` when the option is not
    /// one of the question's options.
    pub fn select_answer(
        &mut self,
        question: QuestionId,
        option: OptionId,
    ) -> Result<(), SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        let Some(found) = self.quiz.question(question) else {
            return Err(SessionError::UnknownQuestion(question));
        };
        if !found.has_option(option) {
            return Err(SessionError::UnknownOption { question, option });
        }

        self.answers.select(question, option);
        Ok(())
    }

    /// Drive the countdown by one second, flooring at zero.
    ///
    /// When the countdown reaches zero while the session is in progress,
    /// the session force-submits: whatever answers are present are scored,
    /// missing ones count as incorrect, and the forced result is returned.
    /// After submission a tick is a no-op returning `None`: the external
    /// timer is cancelled on submission, but a straggler tick must be
    /// harmless.
    pub fn tick(&mut self, at: DateTime<Utc>) -> Option<&QuizResult> {
        if self.is_submitted() {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        self.force_submit(at)
    }

    /// Submit the quiz manually.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadySubmitted` on a second submission and
    /// `SessionError::Incomplete` when any question is unanswered; the
    /// manual path requires full completion before scoring.
    pub fn submit(&mut self, at: DateTime<Utc>) -> Result<&QuizResult, SessionError> {
        if self.is_submitted() {
            return Err(SessionError::AlreadySubmitted);
        }
        let missing = self.answers.missing_count(&self.quiz);
        if missing > 0 {
            return Err(SessionError::Incomplete { missing });
        }

        let result = QuizResult::from_answers(
            &self.quiz,
            &self.answers,
            self.started_at,
            at,
            SubmissionKind::Manual,
        )?;
        Ok(self.result.insert(result))
    }

    fn force_submit(&mut self, at: DateTime<Utc>) -> Option<&QuizResult> {
        // Completed-before-started can only happen with a misbehaving
        // clock; clamp rather than lose the forced submission.
        let completed_at = at.max(self.started_at);
        let result = QuizResult::from_answers(
            &self.quiz,
            &self.answers,
            self.started_at,
            completed_at,
            SubmissionKind::TimedOut,
        )
        .ok()?;
        Some(self.result.insert(result))
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", &self.quiz.id())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("remaining_secs", &self.remaining_secs)
            .field("started_at", &self.started_at)
            .field("submitted", &self.is_submitted())
            .field("result_id", &self.result_id)
            .finish_non_exhaustive()
    }
}

//
// ─── NAVIGATION ────────────────────────────────────────────────────────────────
//

// Navigation lives in navigation.rs; the cursor field stays private to
// the sessions module.
impl QuizSession {
    pub(super) fn set_current(&mut self, index: usize) {
        self.current = index;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
