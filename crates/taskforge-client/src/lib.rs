//! TaskForge Client - Solving-session controller for the quickstart solver service
//!
//! This crate drives a remote solver over its REST API:
//! - [`SolverApi`]: the service boundary, with an HTTP implementation
//! - [`SessionController`]: dataset selection, solve/stop, polling, local edits
//! - [`ScoreAnalyzer`]: constraint breakdowns sorted by severity
//! - [`render`]: a presentation model of the schedule for front ends
//!
//! # Example
//!
//! ```no_run
//! use taskforge_client::{HttpSolverApi, SessionController};
//!
//! # async fn run() -> Result<(), taskforge_client::SessionError> {
//! let session = SessionController::new(HttpSolverApi::new("http://localhost:8080"));
//! session.select_dataset("SMALL").await?;
//! let job_id = session.solve().await?;
//! println!("solving as {job_id}");
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod api;
pub mod error;
pub mod event;
pub mod render;
pub mod session;

#[cfg(test)]
mod test_utils;

pub use analyzer::{AnalysisView, ScoreAnalyzer};
pub use api::{HttpSolverApi, SolveRequest, SolverApi};
pub use error::{AnalysisError, ApiError, ErrorInfo, Result, SessionError, SolveStartError};
pub use event::{Notification, NotificationLevel, SessionEvent};
pub use render::{render, ScheduleView};
pub use session::{RefreshOutcome, SessionController, SessionState, StopOutcome};
