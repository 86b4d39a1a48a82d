//! Pure scoring over a quiz and an answer map.
//!
//! Deterministic and side-effect free. Missing selections count as
//! incorrect rather than erroring, so the same scorer serves both manual
//! submission (where the session has already enforced completeness) and
//! timeout-forced submission (where it has not).

use crate::model::{AnswerMap, QuestionOutcome, Quiz};

/// Grade every question of `quiz` against `answers`, in quiz order.
///
/// A question is correct exactly when a selection exists and equals the
/// question's answer key. A question without a key can never be correct.
#[must_use]
pub fn outcomes(quiz: &Quiz, answers: &AnswerMap) -> Vec<QuestionOutcome> {
    quiz.questions()
        .iter()
        .map(|question| {
            let selected = answers.selected(question.id());
            let correct_option = question.correct_option();
            let is_correct = match (selected, correct_option) {
                (Some(selected), Some(key)) => selected == key,
                _ => false,
            };
            QuestionOutcome {
                question_id: question.id(),
                selected,
                correct_option,
                is_correct,
            }
        })
        .collect()
}

/// Number of correct outcomes.
#[must_use]
pub fn correct_count(outcomes: &[QuestionOutcome]) -> u32 {
    let correct = outcomes.iter().filter(|outcome| outcome.is_correct).count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

/// `round(100 * correct / total)` with round-half-up, in integer
/// arithmetic. Returns 0 when `total` is 0.
#[must_use]
pub fn percentage(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let scaled = (200 * u64::from(correct) + u64::from(total)) / (2 * u64::from(total));
    u8::try_from(scaled.min(100)).unwrap_or(100)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{OptionId, Question, QuestionId, QuestionOption, QuizId};

    fn build_question(id: u64, key: Option<u64>) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec![
                QuestionOption::new(OptionId::new(1), "a"),
                QuestionOption::new(OptionId::new(2), "b"),
            ],
            key.map(OptionId::new),
        )
        .unwrap()
    }

    fn build_quiz(questions: Vec<Question>) -> Quiz {
        Quiz::new(QuizId::new(1), "Quiz", "Subject", 10, questions).unwrap()
    }

    #[test]
    fn grades_in_quiz_order() {
        let quiz = build_quiz(vec![
            build_question(1, Some(2)),
            build_question(2, Some(1)),
            build_question(3, Some(2)),
        ]);
        let mut answers = AnswerMap::new();
        answers.select(QuestionId::new(1), OptionId::new(2));
        answers.select(QuestionId::new(2), OptionId::new(2));

        let graded = outcomes(&quiz, &answers);

        assert_eq!(graded.len(), 3);
        assert!(graded[0].is_correct);
        assert!(!graded[1].is_correct);
        assert!(!graded[2].is_correct);
        assert_eq!(graded[2].selected, None);
        assert_eq!(correct_count(&graded), 1);
    }

    #[test]
    fn unkeyed_questions_are_never_correct() {
        let quiz = build_quiz(vec![build_question(1, None)]);
        let mut answers = AnswerMap::new();
        answers.select(QuestionId::new(1), OptionId::new(1));

        let graded = outcomes(&quiz, &answers);
        assert!(!graded[0].is_correct);
        assert_eq!(graded[0].correct_option, None);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(4, 5), 80);
        assert_eq!(percentage(1, 8), 13); // 12.5 rounds up
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(0, 5), 0);
        assert_eq!(percentage(5, 5), 100);
    }

    #[test]
    fn percentage_of_empty_total_is_zero() {
        assert_eq!(percentage(0, 0), 0);
    }
}
