//! Outcome of one pipeline stage.

use serde::Serialize;

/// Result of a stage that must never abort the session.
///
/// `Degraded` means the stage produced nothing but the flow continues;
/// `Failed` means the user must see an error.
#[derive(Debug, Clone, PartialEq)]
pub enum StageOutcome<T> {
    Success(T),
    Degraded { warning: String },
    Failed { error: String },
}

impl<T> StageOutcome<T> {
    pub fn degraded(warning: impl Into<String>) -> Self {
        Self::Degraded {
            warning: warning.into(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The produced value, `None` for either failure kind.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> StageOutcome<U> {
        match self {
            Self::Success(v) => StageOutcome::Success(f(v)),
            Self::Degraded { warning } => StageOutcome::Degraded { warning },
            Self::Failed { error } => StageOutcome::Failed { error },
        }
    }

    /// Split into the value and the notice the user should see, if any.
    pub fn into_parts(self) -> (Option<T>, Option<Notice>) {
        match self {
            Self::Success(v) => (Some(v), None),
            Self::Degraded { warning } => (None, Some(Notice::warning(warning))),
            Self::Failed { error } => (None, Some(Notice::error(error))),
        }
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Message shown inline to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}
