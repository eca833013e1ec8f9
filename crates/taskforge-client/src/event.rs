//! Session events and user-facing notifications.
//!
//! The controller publishes every observable change on a broadcast channel.
//! Front ends subscribe and redraw; nothing in the controller waits on them.

use std::fmt;

use crate::error::{ErrorInfo, SessionError};
use crate::session::SessionState;

/// Severity of a [`Notification`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotificationLevel::Info => write!(f, "info"),
            NotificationLevel::Warning => write!(f, "warning"),
            NotificationLevel::Error => write!(f, "error"),
        }
    }
}

/// A message meant for the user, optionally carrying the server's error body.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub message: String,
    pub info: Option<ErrorInfo>,
}

impl Notification {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            title: title.into(),
            message: message.into(),
            info: None,
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            title: title.into(),
            message: message.into(),
            info: None,
        }
    }

    /// Builds an error notification from a session failure.
    pub fn from_error(err: &SessionError) -> Self {
        Self {
            level: NotificationLevel::Error,
            title: err.title().to_string(),
            message: err.to_string(),
            info: err.error_info().cloned(),
        }
    }

    pub fn with_info(mut self, info: Option<ErrorInfo>) -> Self {
        self.info = info;
        self
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.message)?;
        if let Some(id) = self.info.as_ref().and_then(|i| i.id.as_deref()) {
            write!(f, " (error id {id})")?;
        }
        Ok(())
    }
}

/// Something observable changed in the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Solve/stop affordances should be recomputed.
    StateChanged { state: SessionState, solving: bool },
    /// The displayed schedule was replaced by a dataset load or a job fetch.
    ScheduleReplaced,
    /// The displayed schedule was edited locally.
    ScheduleEdited,
    /// The score analysis view changed.
    AnalysisUpdated,
    Notification(Notification),
}
