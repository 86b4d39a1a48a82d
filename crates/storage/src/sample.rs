//! Sample quiz content for seeding repositories in tests and demos.

use quiz_core::model::{OptionId, Question, QuestionId, QuestionOption, Quiz, QuizId};

use crate::repository::{QuizRepository, StorageError};

fn question(id: u64, prompt: &str, labels: [&str; 4], correct: u64) -> Question {
    let options = labels
        .iter()
        .enumerate()
        .map(|(i, label)| QuestionOption::new(OptionId::new(i as u64 + 1), *label))
        .collect();
    Question::new(
        QuestionId::new(id),
        prompt,
        options,
        Some(OptionId::new(correct)),
    )
    .expect("sample question should be valid")
}

/// The five-question mathematics quiz. Answer key, in option positions
/// (1 = a .. 4 = d): b, b, b, c, c.
#[must_use]
pub fn mathematics_basics() -> Quiz {
    let questions = vec![
        question(1, "What is 2 + 2?", ["3", "4", "5", "22"], 2),
        question(2, "What is the square root of 16?", ["2", "4", "8", "16"], 2),
        question(3, "If x + 5 = 12, what is x?", ["5", "7", "12", "17"], 2),
        question(4, "What is 3 × 9?", ["12", "21", "27", "39"], 3),
        question(
            5,
            "If a triangle has angles of 60°, 60°, and 60°, what type of triangle is it?",
            ["Scalene", "Isosceles", "Equilateral", "Right-angled"],
            3,
        ),
    ];
    Quiz::new(QuizId::new(1), "Mathematics Basics", "Mathematics", 30, questions)
        .expect("sample quiz should be valid")
}

/// A shorter second subject for list and dashboard scenarios.
#[must_use]
pub fn geography_basics() -> Quiz {
    let questions = vec![
        question(
            1,
            "What is the capital of France?",
            ["Berlin", "Madrid", "Paris", "Rome"],
            3,
        ),
        question(
            2,
            "Which is the largest ocean?",
            ["Atlantic", "Indian", "Arctic", "Pacific"],
            4,
        ),
        question(
            3,
            "Which continent is the Sahara in?",
            ["Asia", "Africa", "Australia", "South America"],
            2,
        ),
    ];
    Quiz::new(QuizId::new(2), "Geography Basics", "Geography", 15, questions)
        .expect("sample quiz should be valid")
}

/// Populate a repository with the sample quizzes.
///
/// # Errors
///
/// Returns `StorageError` when an upsert fails.
pub async fn seed(quizzes: &dyn QuizRepository) -> Result<(), StorageError> {
    quizzes.upsert_quiz(&mathematics_basics()).await?;
    quizzes.upsert_quiz(&geography_basics()).await?;
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
