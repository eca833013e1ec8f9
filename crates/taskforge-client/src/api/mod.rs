//! Boundary to the remote solver service.
//!
//! The session controller only talks to the service through [`SolverApi`],
//! so tests can swap in an in-memory implementation. [`HttpSolverApi`] is
//! the real JSON-over-HTTP client.
//!
//! | Operation            | Endpoint                   |
//! |----------------------|----------------------------|
//! | list datasets        | `GET /demo-data`           |
//! | fetch dataset        | `GET /demo-data/{id}`      |
//! | start solving        | `POST /schedules`          |
//! | list jobs            | `GET /schedules`           |
//! | fetch job            | `GET /schedules/{jobId}`   |
//! | stop solving         | `DELETE /schedules/{jobId}`|
//! | analyze              | `PUT /schedules/analyze`   |

mod http;

use std::future::Future;

use serde::{Deserialize, Serialize};
use taskforge_core::{ConstraintWeights, Schedule, ScoreAnalysis};

use crate::error::ApiError;

pub use http::HttpSolverApi;

/// Body of a solve request: the full schedule plus the weights to solve with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolveRequest {
    #[serde(flatten)]
    pub schedule: Schedule,
    pub constraint_weights: ConstraintWeights,
}

impl SolveRequest {
    pub fn new(schedule: Schedule, constraint_weights: ConstraintWeights) -> Self {
        Self {
            schedule,
            constraint_weights,
        }
    }
}

/// Operations offered by the solver service.
///
/// Every call is an independent round-trip; implementations must not retry.
pub trait SolverApi: Send + Sync + 'static {
    /// Lists the available demo dataset ids.
    fn list_demo_data(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// Fetches a demo dataset (unscored, not solving).
    fn fetch_demo_data(
        &self,
        dataset_id: &str,
    ) -> impl Future<Output = Result<Schedule, ApiError>> + Send;

    /// Submits a schedule for solving and returns the job handle.
    fn start_solving(
        &self,
        request: &SolveRequest,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// Lists the job handles known to the service.
    fn list_jobs(&self) -> impl Future<Output = Result<Vec<String>, ApiError>> + Send;

    /// Fetches the current state of a job.
    fn fetch_schedule(&self, job_id: &str)
        -> impl Future<Output = Result<Schedule, ApiError>> + Send;

    /// Requests early termination of a job. Best effort.
    fn stop_solving(&self, job_id: &str) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Requests a constraint-by-constraint breakdown of a schedule.
    fn analyze(
        &self,
        schedule: &Schedule,
    ) -> impl Future<Output = Result<ScoreAnalysis, ApiError>> + Send;
}
