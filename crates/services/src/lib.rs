#![forbid(unsafe_code)]

pub mod accounts;
pub mod error;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use accounts::{AccountService, CredentialVerifier, NewAccount, Profile};
pub use error::{AccountError, SessionError};

pub use sessions::{
    CompletedQuizItem, DashboardService, PlatformStats, QuizListItem, QuizSession,
    SessionFlowService, SessionProgress, SessionSubmitOutcome, UserStats,
};
