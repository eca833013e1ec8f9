//! In-memory solver service for controller tests.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use taskforge_core::{Schedule, ScoreAnalysis, SolverStatus};
use tokio::sync::Notify;

use crate::api::{SolveRequest, SolverApi};
use crate::error::{ApiError, ErrorInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Op {
    ListDemoData,
    FetchDemoData,
    StartSolving,
    ListJobs,
    FetchSchedule,
    StopSolving,
    Analyze,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    ListDemoData,
    FetchDemoData(String),
    StartSolving(SolveRequest),
    ListJobs,
    FetchSchedule(String),
    StopSolving(String),
    Analyze,
}

impl Call {
    fn op(&self) -> Op {
        match self {
            Call::ListDemoData => Op::ListDemoData,
            Call::FetchDemoData(_) => Op::FetchDemoData,
            Call::StartSolving(_) => Op::StartSolving,
            Call::ListJobs => Op::ListJobs,
            Call::FetchSchedule(_) => Op::FetchSchedule,
            Call::StopSolving(_) => Op::StopSolving,
            Call::Analyze => Op::Analyze,
        }
    }
}

#[derive(Default)]
struct FakeState {
    datasets: Vec<(String, Schedule)>,
    jobs: HashMap<String, Schedule>,
    next_job: u32,
    analysis: ScoreAnalysis,
    failures: HashMap<Op, ApiError>,
    gates: HashMap<Op, Arc<Notify>>,
    calls: Vec<Call>,
}

/// Scriptable [`SolverApi`] that records every call.
///
/// Jobs start as a copy of the submitted schedule with status `SOLVING`
/// and keep that state until a test changes it.
#[derive(Default)]
pub(crate) struct FakeSolverApi {
    state: Mutex<FakeState>,
}

impl FakeSolverApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_dataset(self, id: &str, schedule: Schedule) -> Self {
        self.state.lock().datasets.push((id.to_string(), schedule));
        self
    }

    pub(crate) fn with_analysis(self, analysis: ScoreAnalysis) -> Self {
        self.state.lock().analysis = analysis;
        self
    }

    /// Replaces what the next fetches of `job_id` return.
    pub(crate) fn set_job(&self, job_id: &str, schedule: Schedule) {
        self.state.lock().jobs.insert(job_id.to_string(), schedule);
    }

    /// Marks `job_id` as no longer solving.
    pub(crate) fn finish_job(&self, job_id: &str) {
        if let Some(job) = self.state.lock().jobs.get_mut(job_id) {
            job.solver_status = SolverStatus::NotSolving;
        }
    }

    /// Makes every call of `op` fail with `err` until [`Self::succeed`].
    pub(crate) fn fail(&self, op: Op, err: ApiError) {
        self.state.lock().failures.insert(op, err);
    }

    pub(crate) fn succeed(&self, op: Op) {
        self.state.lock().failures.remove(&op);
    }

    /// Holds calls of `op` until [`Self::release`].
    pub(crate) fn pause(&self, op: Op) {
        self.state
            .lock()
            .gates
            .insert(op, Arc::new(Notify::new()));
    }

    /// Lets one held call of `op` through; later calls are no longer held.
    pub(crate) fn release(&self, op: Op) {
        if let Some(gate) = self.take_gate(op) {
            gate.notify_one();
        }
    }

    /// Stops holding new calls of `op` but keeps already held ones waiting
    /// on the returned gate.
    pub(crate) fn take_gate(&self, op: Op) -> Option<Arc<Notify>> {
        self.state.lock().gates.remove(&op)
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub(crate) fn count(&self, op: Op) -> usize {
        self.state.lock().calls.iter().filter(|c| c.op() == op).count()
    }

    async fn enter(&self, call: Call) -> Result<(), ApiError> {
        let op = call.op();
        let gate = {
            let mut state = self.state.lock();
            state.calls.push(call);
            state.gates.get(&op).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let failure = self.state.lock().failures.get(&op).cloned();
        match failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

pub(crate) fn not_found(message: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        info: Some(ErrorInfo {
            message: message.to_string(),
            code: Some("NOT_FOUND".to_string()),
            ..ErrorInfo::default()
        }),
    }
}

impl SolverApi for FakeSolverApi {
    async fn list_demo_data(&self) -> Result<Vec<String>, ApiError> {
        self.enter(Call::ListDemoData).await?;
        let state = self.state.lock();
        Ok(state.datasets.iter().map(|(id, _)| id.clone()).collect())
    }

    async fn fetch_demo_data(&self, dataset_id: &str) -> Result<Schedule, ApiError> {
        self.enter(Call::FetchDemoData(dataset_id.to_string())).await?;
        let state = self.state.lock();
        state
            .datasets
            .iter()
            .find(|(id, _)| id == dataset_id)
            .map(|(_, schedule)| schedule.clone())
            .ok_or_else(|| not_found("Unknown dataset"))
    }

    async fn start_solving(&self, request: &SolveRequest) -> Result<String, ApiError> {
        self.enter(Call::StartSolving(request.clone())).await?;
        let mut state = self.state.lock();
        state.next_job += 1;
        let job_id = format!("job-{}", state.next_job);
        let mut job = request.schedule.clone();
        job.solver_status = SolverStatus::Solving;
        state.jobs.insert(job_id.clone(), job);
        Ok(job_id)
    }

    async fn list_jobs(&self) -> Result<Vec<String>, ApiError> {
        self.enter(Call::ListJobs).await?;
        let mut ids: Vec<String> = self.state.lock().jobs.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn fetch_schedule(&self, job_id: &str) -> Result<Schedule, ApiError> {
        self.enter(Call::FetchSchedule(job_id.to_string())).await?;
        self.state
            .lock()
            .jobs
            .get(job_id)
            .cloned()
            .ok_or_else(|| not_found("Job not found"))
    }

    async fn stop_solving(&self, job_id: &str) -> Result<(), ApiError> {
        self.enter(Call::StopSolving(job_id.to_string())).await?;
        self.finish_job(job_id);
        Ok(())
    }

    async fn analyze(&self, _schedule: &Schedule) -> Result<ScoreAnalysis, ApiError> {
        self.enter(Call::Analyze).await?;
        Ok(self.state.lock().analysis.clone())
    }
}
