mod answers;
mod ids;
mod question;
mod quiz;
mod result;

pub use answers::AnswerMap;
pub use ids::{OptionId, ParseIdError, QuestionId, QuizId, UserId};

pub use question::{Question, QuestionError, QuestionOption};
pub use quiz::{Quiz, QuizError};
pub use result::{QuestionOutcome, QuizResult, QuizResultError, SubmissionKind};
