use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::answers::AnswerMap;
use crate::model::ids::{OptionId, QuestionId, QuizId};
use crate::model::quiz::Quiz;
use crate::scoring;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("completed_at is before started_at")]
    InvalidTimeRange,

    #[error("too many outcomes for a single result: {len}")]
    TooManyOutcomes { len: usize },

    #[error("correct count ({stored}) does not match outcomes ({actual})")]
    CountMismatch { stored: u32, actual: u32 },

    #[error("percentage ({stored}) does not match outcomes ({actual})")]
    PercentageMismatch { stored: u8, actual: u8 },
}

//
// ─── SUBMISSION KIND ───────────────────────────────────────────────────────────
//

/// How a session reached `Submitted`.
///
/// Manual submission requires a fully answered quiz; a timed-out session is
/// scored with whatever answers were present. The two paths share a scorer
/// but must stay distinguishable in the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmissionKind {
    /// The user submitted the quiz themselves.
    Manual,
    /// The countdown reached zero and forced submission.
    TimedOut,
}

//
// ─── QUESTION OUTCOME ──────────────────────────────────────────────────────────
//

/// Graded outcome for one question: what was selected, what the key was,
/// and whether they match. `selected` is `None` when the question was
/// never answered (possible only on the timed-out path).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionOutcome {
    pub question_id: QuestionId,
    pub selected: Option<OptionId>,
    pub correct_option: Option<OptionId>,
    pub is_correct: bool,
}

//
// ─── QUIZ RESULT ───────────────────────────────────────────────────────────────
//

/// The scored outcome of a completed (or forcibly ended) session.
///
/// Produced exactly once, at submission time, and immutable after that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    quiz_id: QuizId,
    started_at: DateTime<Utc>,
    completed_at: DateTime<Utc>,
    kind: SubmissionKind,
    outcomes: Vec<QuestionOutcome>,
    correct_count: u32,
    percentage: u8,
}

impl QuizResult {
    /// Score an answer map against a quiz and freeze the outcome.
    ///
    /// Missing answers count as incorrect, which is what makes this shared
    /// between manual and timed-out submission; completeness enforcement for
    /// the manual path belongs to the session, not here.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::InvalidTimeRange` if `completed_at` is
    /// before `started_at`, or `QuizResultError::TooManyOutcomes` if the
    /// question count cannot fit in `u32`.
    pub fn from_answers(
        quiz: &Quiz,
        answers: &AnswerMap,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        kind: SubmissionKind,
    ) -> Result<Self, QuizResultError> {
        if completed_at < started_at {
            return Err(QuizResultError::InvalidTimeRange);
        }

        let outcomes = scoring::outcomes(quiz, answers);
        let total = u32::try_from(outcomes.len())
            .map_err(|_| QuizResultError::TooManyOutcomes {
                len: outcomes.len(),
            })?;
        let correct_count = scoring::correct_count(&outcomes);
        let percentage = scoring::percentage(correct_count, total);

        Ok(Self {
            quiz_id: quiz.id(),
            started_at,
            completed_at,
            kind,
            outcomes,
            correct_count,
            percentage,
        })
    }

    /// Rehydrate a result from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::InvalidTimeRange` for inverted timestamps,
    /// `QuizResultError::CountMismatch` when the stored correct count does
    /// not match the outcomes, and `QuizResultError::PercentageMismatch`
    /// when the stored percentage does not match the recomputed value.
    pub fn from_persisted(
        quiz_id: QuizId,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
        kind: SubmissionKind,
        outcomes: Vec<QuestionOutcome>,
        correct_count: u32,
        percentage: u8,
    ) -> Result<Self, QuizResultError> {
        if completed_at < started_at {
            return Err(QuizResultError::InvalidTimeRange);
        }
        let total = u32::try_from(outcomes.len())
            .map_err(|_| QuizResultError::TooManyOutcomes {
                len: outcomes.len(),
            })?;

        let actual = scoring::correct_count(&outcomes);
        if actual != correct_count {
            return Err(QuizResultError::CountMismatch {
                stored: correct_count,
                actual,
            });
        }

        let recomputed = scoring::percentage(correct_count, total);
        if recomputed != percentage {
            return Err(QuizResultError::PercentageMismatch {
                stored: percentage,
                actual: recomputed,
            });
        }

        Ok(Self {
            quiz_id,
            started_at,
            completed_at,
            kind,
            outcomes,
            correct_count,
            percentage,
        })
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn kind(&self) -> SubmissionKind {
        self.kind
    }

    /// Per-question outcomes in quiz order.
    #[must_use]
    pub fn outcomes(&self) -> &[QuestionOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        // Length was validated to fit in u32 by both constructors.
        self.outcomes.len() as u32
    }

    /// Aggregate score, 0-100, rounded half-up.
    #[must_use]
    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Wall-clock time between session start and submission.
    #[must_use]
    pub fn time_taken(&self) -> Duration {
        self.completed_at - self.started_at
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::question::{Question, QuestionOption};
    use crate::time::fixed_now;

    fn build_quiz() -> Quiz {
        // Answer key b, b, b, c, c in option-index form (a=1, b=2, c=3, d=4).
        let keys = [2, 2, 2, 3, 3];
        let questions = keys
            .iter()
            .enumerate()
            .map(|(i, key)| {
                Question::new(
                    QuestionId::new(i as u64 + 1),
                    format!("Q{}", i + 1),
                    vec![
                        QuestionOption::new(OptionId::new(1), "a"),
                        QuestionOption::new(OptionId::new(2), "b"),
                        QuestionOption::new(OptionId::new(3), "c"),
                        QuestionOption::new(OptionId::new(4), "d"),
                    ],
                    Some(OptionId::new(*key)),
                )
                .unwrap()
            })
            .collect();
        Quiz::new(QuizId::new(1), "Mathematics Basics", "Mathematics", 30, questions).unwrap()
    }

    #[test]
    fn scores_four_of_five_as_eighty_percent() {
        let quiz = build_quiz();
        let mut answers = AnswerMap::new();
        // User answers b, b, b, b, c: question 4 is wrong.
        for (question, option) in [(1, 2), (2, 2), (3, 2), (4, 2), (5, 3)] {
            answers.select(QuestionId::new(question), OptionId::new(option));
        }

        let result = QuizResult::from_answers(
            &quiz,
            &answers,
            fixed_now(),
            fixed_now() + Duration::minutes(12),
            SubmissionKind::Manual,
        )
        .unwrap();

        assert_eq!(result.correct_count(), 4);
        assert_eq!(result.total_questions(), 5);
        assert_eq!(result.percentage(), 80);
        assert_eq!(result.kind(), SubmissionKind::Manual);
        assert_eq!(result.time_taken(), Duration::minutes(12));

        let fourth = &result.outcomes()[3];
        assert_eq!(fourth.question_id, QuestionId::new(4));
        assert_eq!(fourth.selected, Some(OptionId::new(2)));
        assert_eq!(fourth.correct_option, Some(OptionId::new(3)));
        assert!(!fourth.is_correct);
    }

    #[test]
    fn scores_missing_answers_as_incorrect() {
        let quiz = build_quiz();
        let mut answers = AnswerMap::new();
        for (question, option) in [(1, 2), (2, 2), (3, 2)] {
            answers.select(QuestionId::new(question), OptionId::new(option));
        }

        let result = QuizResult::from_answers(
            &quiz,
            &answers,
            fixed_now(),
            fixed_now(),
            SubmissionKind::TimedOut,
        )
        .unwrap();

        assert_eq!(result.correct_count(), 3);
        assert_eq!(result.percentage(), 60);
        assert_eq!(result.kind(), SubmissionKind::TimedOut);
        assert_eq!(result.outcomes()[3].selected, None);
        assert!(!result.outcomes()[3].is_correct);
        assert_eq!(result.outcomes()[4].selected, None);
    }

    #[test]
    fn rejects_inverted_time_range() {
        let quiz = build_quiz();
        let err = QuizResult::from_answers(
            &quiz,
            &AnswerMap::new(),
            fixed_now(),
            fixed_now() - Duration::seconds(1),
            SubmissionKind::Manual,
        )
        .unwrap_err();
        assert_eq!(err, QuizResultError::InvalidTimeRange);
    }

    #[test]
    fn from_persisted_rejects_count_mismatch() {
        let outcomes = vec![QuestionOutcome {
            question_id: QuestionId::new(1),
            selected: Some(OptionId::new(2)),
            correct_option: Some(OptionId::new(2)),
            is_correct: true,
        }];

        let err = QuizResult::from_persisted(
            QuizId::new(1),
            fixed_now(),
            fixed_now(),
            SubmissionKind::Manual,
            outcomes,
            0,
            100,
        )
        .unwrap_err();
        assert_eq!(err, QuizResultError::CountMismatch { stored: 0, actual: 1 });
    }

    #[test]
    fn from_persisted_rejects_percentage_mismatch() {
        let outcomes = vec![QuestionOutcome {
            question_id: QuestionId::new(1),
            selected: Some(OptionId::new(2)),
            correct_option: Some(OptionId::new(2)),
            is_correct: true,
        }];

        let err = QuizResult::from_persisted(
            QuizId::new(1),
            fixed_now(),
            fixed_now(),
            SubmissionKind::Manual,
            outcomes,
            1,
            99,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizResultError::PercentageMismatch {
                stored: 99,
                actual: 100
            }
        );
    }
}
