mod navigation;
mod progress;
mod session;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use progress::SessionProgress;
pub use session::QuizSession;
pub use view::{
    CompletedQuizItem, DashboardService, PlatformStats, QuizListItem, UserStats,
};
pub use workflow::{SessionFlowService, SessionSubmitOutcome};
