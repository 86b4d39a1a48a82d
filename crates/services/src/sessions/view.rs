use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use quiz_core::model::{Quiz, QuizId, SubmissionKind, UserId};
use quiz_core::scoring;
use storage::repository::{
    QuizRepository, ResultId, ResultRepository, ResultRow, UserRepository,
};

use crate::Clock;
use crate::error::SessionError;

/// Presentation-agnostic list item for a quiz a user can start.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The UI may format time limits and counts as needed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizListItem {
    pub id: QuizId,
    pub title: String,
    pub subject: String,
    pub time_limit_minutes: u32,
    pub question_count: usize,
}

impl QuizListItem {
    #[must_use]
    pub fn from_quiz(quiz: &Quiz) -> Self {
        Self {
            id: quiz.id(),
            title: quiz.title().to_owned(),
            subject: quiz.subject().to_owned(),
            time_limit_minutes: quiz.time_limit_minutes(),
            question_count: quiz.total_questions(),
        }
    }
}

/// One row of a user's result history.
///
/// `title` is `None` when the quiz has since been removed from the bank;
/// history rows are never dropped on that account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedQuizItem {
    pub result_id: ResultId,
    pub quiz_id: QuizId,
    pub title: Option<String>,
    pub percentage: u8,
    pub correct_count: u32,
    pub total_questions: u32,
    pub completed_at: DateTime<Utc>,
    pub kind: SubmissionKind,
}

impl CompletedQuizItem {
    #[must_use]
    pub fn from_row(row: &ResultRow, title: Option<String>) -> Self {
        Self {
            result_id: row.id,
            quiz_id: row.result.quiz_id(),
            title,
            percentage: row.result.percentage(),
            correct_count: row.result.correct_count(),
            total_questions: row.result.total_questions(),
            completed_at: row.result.completed_at(),
            kind: row.result.kind(),
        }
    }
}

/// Aggregates over one user's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub quizzes_taken: u32,
    /// Mean of the per-attempt percentages, rounded half-up; 0 with no
    /// attempts.
    pub average_percentage: u8,
}

/// Platform-wide counters for the admin overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlatformStats {
    pub total_quizzes: u64,
    pub total_users: u64,
    pub total_attempts: u64,
}

/// Presentation-facing dashboard facade that hides repositories and time
/// from the UI.
#[derive(Clone)]
pub struct DashboardService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    results: Arc<dyn ResultRepository>,
    users: Arc<dyn UserRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        results: Arc<dyn ResultRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            results,
            users,
        }
    }

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Quizzes a user can start, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn available_quizzes(&self) -> Result<Vec<QuizListItem>, SessionError> {
        let quizzes = self.quizzes.list_quizzes().await?;
        Ok(quizzes.iter().map(QuizListItem::from_quiz).collect())
    }

    /// A user's completed attempts, oldest first, with titles resolved
    /// against the current quiz bank.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn completed_quizzes(
        &self,
        user: UserId,
    ) -> Result<Vec<CompletedQuizItem>, SessionError> {
        let rows = self.results.list_results_for_user(user).await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let title = self
                .quizzes
                .get_quiz(row.result.quiz_id())
                .await?
                .map(|quiz| quiz.title().to_owned());
            items.push(CompletedQuizItem::from_row(row, title));
        }
        Ok(items)
    }

    /// Attempt count and half-up mean percentage for one user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn user_stats(&self, user: UserId) -> Result<UserStats, SessionError> {
        let rows = self.results.list_results_for_user(user).await?;
        let taken = u32::try_from(rows.len()).unwrap_or(u32::MAX);
        if taken == 0 {
            return Ok(UserStats {
                quizzes_taken: 0,
                average_percentage: 0,
            });
        }

        let sum: u32 = rows.iter().map(|row| u32::from(row.result.percentage())).sum();
        // percentage(sum, 100 * n) is round(sum / n) with the same
        // half-up rule used for individual scores.
        let average_percentage = scoring::percentage(sum, 100 * taken);
        Ok(UserStats {
            quizzes_taken: taken,
            average_percentage,
        })
    }

    /// Platform-wide counters.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Storage` on repository failures.
    pub async fn platform_stats(&self) -> Result<PlatformStats, SessionError> {
        Ok(PlatformStats {
            total_quizzes: self.quizzes.count_quizzes().await?,
            total_users: self.users.count_users().await?,
            total_attempts: self.results.count_results().await?,
        })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AnswerMap, OptionId, QuestionId, QuizResult};
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;
    use storage::sample;

    fn service_over(repo: &InMemoryRepository) -> DashboardService {
        DashboardService::new(
            fixed_clock(),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    async fn store_attempt(repo: &InMemoryRepository, user: UserId, answers: &[(u64, u64)]) {
        let quiz = sample::mathematics_basics();
        let mut map = AnswerMap::new();
        for (question, option) in answers {
            map.select(QuestionId::new(*question), OptionId::new(*option));
        }
        let result = QuizResult::from_answers(
            &quiz,
            &map,
            fixed_now(),
            fixed_now(),
            SubmissionKind::TimedOut,
        )
        .unwrap();
        repo.append_result(user, &result).await.unwrap();
    }

    #[tokio::test]
    async fn lists_available_quizzes() {
        let repo = InMemoryRepository::new();
        sample::seed(&repo).await.unwrap();

        let items = service_over(&repo).available_quizzes().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Mathematics Basics");
        assert_eq!(items[0].question_count, 5);
        assert_eq!(items[0].time_limit_minutes, 30);
        assert_eq!(items[1].subject, "Geography");
    }

    #[tokio::test]
    async fn completed_quizzes_resolve_titles() {
        let repo = InMemoryRepository::new();
        sample::seed(&repo).await.unwrap();
        let user = UserId::random();
        store_attempt(&repo, user, &[(1, 2), (2, 2), (3, 2), (4, 3), (5, 3)]).await;

        let items = service_over(&repo).completed_quizzes(user).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title.as_deref(), Some("Mathematics Basics"));
        assert_eq!(items[0].percentage, 100);
        assert_eq!(items[0].total_questions, 5);
    }

    #[tokio::test]
    async fn completed_quizzes_keep_rows_for_missing_quizzes() {
        let repo = InMemoryRepository::new();
        // Attempt recorded without the quiz ever entering the bank.
        let user = UserId::random();
        store_attempt(&repo, user, &[(1, 2)]).await;

        let items = service_over(&repo).completed_quizzes(user).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, None);
        assert_eq!(items[0].percentage, 20);
    }

    #[tokio::test]
    async fn user_stats_average_rounds_half_up() {
        let repo = InMemoryRepository::new();
        let user = UserId::random();
        // 100% and 20% and 20%: mean 46.67 rounds to 47.
        store_attempt(&repo, user, &[(1, 2), (2, 2), (3, 2), (4, 3), (5, 3)]).await;
        store_attempt(&repo, user, &[(1, 2)]).await;
        store_attempt(&repo, user, &[(2, 2)]).await;

        let stats = service_over(&repo).user_stats(user).await.unwrap();
        assert_eq!(stats.quizzes_taken, 3);
        assert_eq!(stats.average_percentage, 47);
    }

    #[tokio::test]
    async fn user_stats_empty_history_is_zero() {
        let repo = InMemoryRepository::new();
        let stats = service_over(&repo).user_stats(UserId::random()).await.unwrap();
        assert_eq!(stats.quizzes_taken, 0);
        assert_eq!(stats.average_percentage, 0);
    }

    #[tokio::test]
    async fn platform_stats_count_everything() {
        let repo = InMemoryRepository::new();
        sample::seed(&repo).await.unwrap();
        store_attempt(&repo, UserId::random(), &[(1, 2)]).await;
        store_attempt(&repo, UserId::random(), &[(1, 1)]).await;

        let stats = service_over(&repo).platform_stats().await.unwrap();
        assert_eq!(stats.total_quizzes, 2);
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_attempts, 2);
    }
}
