use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{Quiz, QuizId, QuizResult, UserId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Storage identifier for a persisted quiz result.
pub type ResultId = i64;

/// A persisted result together with its row id and owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub id: ResultId,
    pub user_id: UserId,
    pub result: QuizResult,
}

/// Persisted shape for a registered account.
///
/// The mock credential store keeps the secret verbatim. It never crosses
/// into `quiz-core`; comparison happens behind the services-layer
/// verifier seam.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub secret: String,
    pub created_at: DateTime<Utc>,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("secret", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Repository contract for the quiz bank.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist or update a quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError>;

    /// Fetch a quiz by ID, `None` when unknown.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError>;

    /// List all quizzes, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError>;

    /// Total number of stored quizzes.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn count_quizzes(&self) -> Result<u64, StorageError>;
}

/// Repository contract for the append-only result log.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    /// Append a scored result attributed to a user, returning its row id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the result cannot be stored.
    async fn append_result(
        &self,
        user_id: UserId,
        result: &QuizResult,
    ) -> Result<ResultId, StorageError>;

    /// Fetch a result row by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_result(&self, id: ResultId) -> Result<ResultRow, StorageError>;

    /// All results for a user, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_results_for_user(&self, user_id: UserId) -> Result<Vec<ResultRow>, StorageError>;

    /// Total number of stored results across all users.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn count_results(&self) -> Result<u64, StorageError>;
}

/// Repository contract for registered accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the email is already
    /// registered, or other storage errors.
    async fn create_user(&self, record: &UserRecord) -> Result<(), StorageError>;

    /// Look an account up by email, `None` when unknown.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    /// Total number of registered accounts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn count_users(&self) -> Result<u64, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// Also the only backend: the platform runs on mock data and durable
/// storage is deliberately out of scope.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    results: Arc<Mutex<Vec<ResultRow>>>,
    users: Arc<Mutex<HashMap<String, UserRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            quizzes: Arc::new(Mutex::new(HashMap::new())),
            results: Arc::new(Mutex::new(Vec::new())),
            users: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: QuizId) -> Result<Option<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn list_quizzes(&self) -> Result<Vec<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut quizzes: Vec<Quiz> = guard.values().cloned().collect();
        quizzes.sort_by_key(Quiz::id);
        Ok(quizzes)
    }

    async fn count_quizzes(&self) -> Result<u64, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }
}

#[async_trait]
impl ResultRepository for InMemoryRepository {
    async fn append_result(
        &self,
        user_id: UserId,
        result: &QuizResult,
    ) -> Result<ResultId, StorageError> {
        let mut guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let id = guard.len() as ResultId + 1;
        guard.push(ResultRow {
            id,
            user_id,
            result: result.clone(),
        });
        Ok(id)
    }

    async fn get_result(&self, id: ResultId) -> Result<ResultRow, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|row| row.id == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn list_results_for_user(&self, user_id: UserId) -> Result<Vec<ResultRow>, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn count_results(&self) -> Result<u64, StorageError> {
        let guard = self
            .results
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn create_user(&self, record: &UserRecord) -> Result<(), StorageError> {
        let mut guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.contains_key(&record.email) {
            return Err(StorageError::Conflict);
        }
        guard.insert(record.email.clone(), record.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(email).cloned())
    }

    async fn count_users(&self) -> Result<u64, StorageError> {
        let guard = self
            .users
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }
}

/// Aggregates the three repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub results: Arc<dyn ResultRepository>,
    pub users: Arc<dyn UserRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let results: Arc<dyn ResultRepository> = Arc::new(repo.clone());
        let users: Arc<dyn UserRepository> = Arc::new(repo);
        Self {
            quizzes,
            results,
            users,
        }
    }
}
