//! Cursor movement between questions.
//!
//! Navigation only moves the index: it never touches the answer map and
//! never requires the current question to be answered. Completeness is
//! enforced at submission, not while moving around. It also stays legal
//! after submission, so a submitted session can be walked for review.

use super::session::QuizSession;
use crate::error::SessionError;

impl QuizSession {
    /// Move to the next question; no-op on the last one.
    pub fn next_question(&mut self) {
        if self.current_index() < self.quiz().total_questions() - 1 {
            self.set_current(self.current_index() + 1);
        }
    }

    /// Move to the previous question; no-op on the first one.
    pub fn previous_question(&mut self) {
        if self.current_index() > 0 {
            self.set_current(self.current_index() - 1);
        }
    }

    /// Jump directly to a question by index.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::IndexOutOfRange` when `index` is not a valid
    /// question position; the cursor is left where it was.
    pub fn go_to(&mut self, index: usize) -> Result<(), SessionError> {
        let total = self.quiz().total_questions();
        if index >= total {
            return Err(SessionError::IndexOutOfRange { index, total });
        }
        self.set_current(index);
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
