//! Error types for the solver API boundary and the solving session

use serde::{Deserialize, Serialize};
use taskforge_core::EditError;
use thiserror::Error;

/// Structured error body returned by the solver service.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorInfo {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
    /// Correlation id for server-side logs.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub details: Option<serde_json::Value>,
}

/// Failure talking to the solver service.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, timeout, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    ///
    /// `info` is `None` when the body was missing or not a structured error.
    #[error("Server responded with status {status}{}", status_suffix(.info))]
    Status { status: u16, info: Option<ErrorInfo> },

    /// The response body did not have the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),
}

fn status_suffix(info: &Option<ErrorInfo>) -> String {
    match info {
        Some(info) if !info.message.is_empty() => format!(": {}", info.message),
        _ => String::new(),
    }
}

impl ApiError {
    /// Returns the structured error body, if the server sent one.
    pub fn info(&self) -> Option<&ErrorInfo> {
        match self {
            ApiError::Status { info, .. } => info.as_ref(),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

/// Why a solve could not be started.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveStartError {
    #[error("no schedule is loaded")]
    NoSchedule,

    #[error("a solve job is already active")]
    AlreadySolving,

    /// A different dataset was selected while the request was in flight
    #[error("the dataset changed while the solve request was in flight")]
    Superseded,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Why a score analysis failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("no schedule is loaded")]
    NoSchedule,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Main error type for solving-session operations.
///
/// None of these are fatal: the session stays usable and the user can retry
/// or select another dataset.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Fetching a dataset, a job, or the dataset list failed
    #[error("Failed to load data: {0}")]
    DataLoad(#[source] ApiError),

    #[error("Failed to start solving: {0}")]
    SolveStart(#[from] SolveStartError),

    /// Server-side termination failed; the local session still stopped
    #[error("Failed to stop solving: {0}")]
    Stop(#[source] ApiError),

    #[error("Score analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    /// `stop` was called without a job handle
    #[error("No solve job has been started")]
    NoActiveJob,

    #[error(transparent)]
    Edit(#[from] EditError),
}

impl SessionError {
    /// Short title used for user-facing notifications.
    pub fn title(&self) -> &'static str {
        match self {
            SessionError::DataLoad(_) => "Data loading failed",
            SessionError::SolveStart(_) => "Start solving failed",
            SessionError::Stop(_) => "Stop solving failed",
            SessionError::Analysis(_) => "Analyze failed",
            SessionError::NoActiveJob => "Nothing to stop",
            SessionError::Edit(_) => "Edit rejected",
        }
    }

    /// Returns the structured server error behind this failure, if any.
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            SessionError::DataLoad(e) | SessionError::Stop(e) => e.info(),
            SessionError::SolveStart(SolveStartError::Api(e)) => e.info(),
            SessionError::Analysis(AnalysisError::Api(e)) => e.info(),
            _ => None,
        }
    }
}

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
