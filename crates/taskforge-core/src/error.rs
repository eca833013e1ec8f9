//! Error types for local schedule edits

use thiserror::Error;

/// Error raised when a local edit cannot be applied.
///
/// A rejected edit never mutates the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// A resource with this name already exists
    #[error("Resource '{name}' already exists")]
    DuplicateResource { name: String },

    /// No resource with this name exists
    #[error("Unknown resource '{name}'")]
    UnknownResource { name: String },

    /// No task with this id exists
    #[error("Unknown task '{id}'")]
    UnknownTask { id: String },

    /// Tasks must have a positive duration
    #[error("Task '{name}' must have a positive duration")]
    InvalidDuration { name: String },

    /// No schedule is loaded to edit
    #[error("No schedule is loaded")]
    NoSchedule,

    /// Edits are not accepted while a solve job is active
    #[error("Cannot edit the schedule while solving")]
    SolveInProgress,
}

/// Result type alias for local edits
pub type Result<T> = std::result::Result<T, EditError>;
