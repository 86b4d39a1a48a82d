use thiserror::Error;

use crate::model::{QuestionError, QuizError, QuizResultError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Result(#[from] QuizResultError),
}
