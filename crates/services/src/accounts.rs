//! Account registration and credential verification.
//!
//! The session core never sees credentials: it consumes a `UserId` only
//! to attribute results. Verification lives behind the
//! [`CredentialVerifier`] seam so a real deployment can swap the mock
//! store for an actual identity provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use quiz_core::model::UserId;
use storage::repository::{StorageError, UserRecord, UserRepository};

use crate::Clock;
use crate::error::AccountError;

/// Registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub secret: String,
}

/// A signed-in user as exposed to the rest of the system.
///
/// Deliberately secret-free; this is the only account shape that leaves
/// the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    fn from_record(record: &UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email.clone(),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            created_at: record.created_at,
        }
    }
}

/// External credential-verification collaborator.
///
/// `verify` answers "who is this?" and nothing else; results are
/// attributed to the returned id.
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Check an email/secret pair and return the account id.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidCredentials` for an unknown email or
    /// a mismatched secret, or `AccountError::Storage` on lookup failures.
    async fn verify(&self, email: &str, secret: &str) -> Result<UserId, AccountError>;
}

/// Registration and login over a user repository.
#[derive(Clone)]
pub struct AccountService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
}

impl AccountService {
    #[must_use]
    pub fn new(clock: Clock, users: Arc<dyn UserRepository>) -> Self {
        Self { clock, users }
    }

    /// Create an account and return its profile.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::EmailTaken` when the email is already
    /// registered, or `AccountError::Storage` on repository failures.
    pub async fn register(&self, account: NewAccount) -> Result<Profile, AccountError> {
        let record = UserRecord {
            id: UserId::random(),
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
            secret: account.secret,
            created_at: self.clock.now(),
        };

        match self.users.create_user(&record).await {
            Ok(()) => Ok(Profile::from_record(&record)),
            Err(StorageError::Conflict) => Err(AccountError::EmailTaken),
            Err(err) => Err(err.into()),
        }
    }

    /// Check credentials and return the matching profile.
    ///
    /// Unknown email and wrong secret are indistinguishable to the caller.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidCredentials` or
    /// `AccountError::Storage`.
    pub async fn login(&self, email: &str, secret: &str) -> Result<Profile, AccountError> {
        let Some(record) = self.users.find_by_email(email).await? else {
            return Err(AccountError::InvalidCredentials);
        };
        if record.secret != secret {
            return Err(AccountError::InvalidCredentials);
        }
        Ok(Profile::from_record(&record))
    }
}

#[async_trait]
impl CredentialVerifier for AccountService {
    async fn verify(&self, email: &str, secret: &str) -> Result<UserId, AccountError> {
        self.login(email, secret).await.map(|profile| profile.id)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
