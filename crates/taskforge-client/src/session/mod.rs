//! The solving session.
//!
//! [`SessionController`] owns the loaded schedule and the state machine
//!
//! ```text
//! Idle ──select──▶ DatasetLoaded ──solve──▶ Solving
//!                        ▲                     │
//!                        └── stop / terminal ──┘
//! ```
//!
//! Every transition goes through a controller method. Network round-trips
//! are the only suspension points and the session lock is never held
//! across them. Fetched schedules carry a sequence number and the session
//! generation they were requested under; anything older than what is
//! already shown, or requested before a dataset reselect or solve start, is
//! discarded.

mod sync;


use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use taskforge_config::{ClientConfig, DEFAULT_POLL_INTERVAL_MS};
use taskforge_core::{
    ConstraintKey, ConstraintWeights, EditError, NewTask, Resource, Schedule, ScheduleMetrics,
    ScoreAnalysis, SolverStatus, Task,
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::analyzer::{AnalysisView, ScoreAnalyzer};
use crate::api::{HttpSolverApi, SolveRequest, SolverApi};
use crate::error::{ApiError, Result, SessionError, SolveStartError};
use crate::event::{Notification, SessionEvent};

use sync::PollHandle;

/// Capacity of the event channel. Slow subscribers skip ahead.
const EVENT_CAPACITY: usize = 64;

/// Lifecycle state of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    #[default]
    Idle,
    DatasetLoaded,
    Solving,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Idle => write!(f, "idle"),
            SessionState::DatasetLoaded => write!(f, "dataset loaded"),
            SessionState::Solving => write!(f, "solving"),
        }
    }
}

/// Result of a [`SessionController::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched schedule replaced the local one.
    ///
    /// `terminal` is set when the job reported it had stopped solving and
    /// the session left the Solving state because of it.
    Applied { terminal: bool },
    /// A newer response or a session change made this one obsolete.
    Discarded,
    /// No dataset or job is selected.
    NothingToRefresh,
}

/// Result of a [`SessionController::stop`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopOutcome {
    pub job_id: String,
    /// Whether the service acknowledged the termination request.
    pub terminated: bool,
    /// Result of the final fetch, `None` if it failed.
    pub final_fetch: Option<RefreshOutcome>,
}

#[derive(Debug, Default)]
struct Session {
    state: SessionState,
    demo_data_id: Option<String>,
    schedule_id: Option<String>,
    poll: Option<PollHandle>,
    schedule: Option<Schedule>,
    // A solve request is in flight.
    solve_pending: bool,
    generation: u64,
    next_seq: u64,
    last_applied_seq: u64,
    latest_select_seq: u64,
}

impl Session {
    fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    fn stop_polling(&mut self) {
        if let Some(mut poll) = self.poll.take() {
            poll.stop();
        }
    }
}

enum FetchTarget {
    Job(String),
    Dataset(String),
}

pub(crate) struct Inner<A> {
    api: A,
    session: Mutex<Session>,
    weights: Mutex<ConstraintWeights>,
    analyzer: ScoreAnalyzer,
    events: broadcast::Sender<SessionEvent>,
    poll_interval: Duration,
}

/// Cloneable handle to a solving session.
///
/// Clones share the same session; the synchronization loop only holds a weak
/// reference, so dropping the last handle also stops polling.
pub struct SessionController<A: SolverApi = HttpSolverApi> {
    inner: Arc<Inner<A>>,
}

impl<A: SolverApi> Clone for SessionController<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: SolverApi> fmt::Debug for SessionController<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.inner.session.lock();
        f.debug_struct("SessionController")
            .field("state", &session.state)
            .field("demo_data_id", &session.demo_data_id)
            .field("schedule_id", &session.schedule_id)
            .field("generation", &session.generation)
            .finish_non_exhaustive()
    }
}

impl SessionController<HttpSolverApi> {
    /// Creates a session talking HTTP to the configured service.
    pub fn from_config(config: &ClientConfig) -> std::result::Result<Self, ApiError> {
        let api = HttpSolverApi::from_config(config)?;
        Ok(Self::with_settings(
            api,
            config.poll_interval(),
            config.constraint_weights(),
        ))
    }
}

impl<A: SolverApi> SessionController<A> {
    /// Creates an idle session with default weights and poll interval.
    pub fn new(api: A) -> Self {
        Self::with_settings(
            api,
            Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            ConstraintWeights::default(),
        )
    }

    pub fn with_settings(api: A, poll_interval: Duration, weights: ConstraintWeights) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                api,
                session: Mutex::new(Session::default()),
                weights: Mutex::new(weights),
                analyzer: ScoreAnalyzer::new(),
                events,
                poll_interval,
            }),
        }
    }

    pub(crate) fn from_inner(inner: Arc<Inner<A>>) -> Self {
        Self { inner }
    }

    pub fn api(&self) -> &A {
        &self.inner.api
    }

    pub fn poll_interval(&self) -> Duration {
        self.inner.poll_interval
    }

    /// Subscribes to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    // ---- read accessors ----

    pub fn state(&self) -> SessionState {
        self.inner.session.lock().state
    }

    pub fn is_solving(&self) -> bool {
        self.state() == SessionState::Solving
    }

    /// Returns a snapshot of the loaded schedule.
    pub fn schedule(&self) -> Option<Schedule> {
        self.inner.session.lock().schedule.clone()
    }

    /// Runs `f` against the loaded schedule without cloning it.
    pub fn with_schedule<R>(&self, f: impl FnOnce(Option<&Schedule>) -> R) -> R {
        let session = self.inner.session.lock();
        f(session.schedule.as_ref())
    }

    pub fn demo_data_id(&self) -> Option<String> {
        self.inner.session.lock().demo_data_id.clone()
    }

    /// Handle of the most recent solve job, kept after it finishes so the
    /// terminal solution can still be fetched.
    pub fn schedule_id(&self) -> Option<String> {
        self.inner.session.lock().schedule_id.clone()
    }

    pub fn is_polling(&self) -> bool {
        self.inner
            .session
            .lock()
            .poll
            .as_ref()
            .is_some_and(PollHandle::is_running)
    }

    /// Locally derived metrics for the loaded schedule.
    pub fn metrics(&self) -> Option<ScheduleMetrics> {
        self.with_schedule(|schedule| schedule.map(Schedule::metrics))
    }

    pub fn analysis(&self) -> AnalysisView {
        self.inner.analyzer.view()
    }

    // ---- constraint weights ----

    /// Weights that the next solve will be submitted with.
    pub fn weights(&self) -> ConstraintWeights {
        *self.inner.weights.lock()
    }

    pub fn set_weight(&self, key: ConstraintKey, weight: i32) {
        debug!(constraint = key.key(), weight, "Setting constraint weight");
        self.inner.weights.lock().set(key, weight);
    }

    pub fn reset_weight(&self, key: ConstraintKey) {
        self.inner.weights.lock().reset(key);
    }

    pub fn reset_weights(&self) {
        self.inner.weights.lock().reset_all();
    }

    // ---- remote operations ----

    /// Lists the demo datasets offered by the service.
    pub async fn list_datasets(&self) -> Result<Vec<String>> {
        match self.inner.api.list_demo_data().await {
            Ok(ids) => {
                debug!(count = ids.len(), "Listed datasets");
                Ok(ids)
            }
            Err(err) => Err(self.fail(SessionError::DataLoad(err))),
        }
    }

    /// Lists the job handles known to the service.
    pub async fn list_jobs(&self) -> Result<Vec<String>> {
        self.inner
            .api
            .list_jobs()
            .await
            .map_err(|err| self.fail(SessionError::DataLoad(err)))
    }

    /// Loads a demo dataset, abandoning any job in progress.
    ///
    /// On failure the session keeps its previous state; a state event is
    /// still emitted so observers can re-sync.
    pub async fn select_dataset(&self, dataset_id: &str) -> Result<()> {
        let seq = {
            let mut session = self.inner.session.lock();
            let seq = session.next_seq();
            session.latest_select_seq = seq;
            seq
        };
        info!(dataset = %dataset_id, seq, "Loading dataset");

        let mut schedule = match self.inner.api.fetch_demo_data(dataset_id).await {
            Ok(schedule) => schedule,
            Err(err) => {
                self.emit_state();
                return Err(self.fail(SessionError::DataLoad(err)));
            }
        };
        schedule.score = None;
        schedule.solver_status = SolverStatus::NotSolving;

        let abandoned = {
            let mut session = self.inner.session.lock();
            if session.latest_select_seq != seq {
                None
            } else {
                let was_solving = session.state == SessionState::Solving;
                session.stop_polling();
                let job_id = session.schedule_id.take();
                session.demo_data_id = Some(dataset_id.to_string());
                session.schedule = Some(schedule);
                session.generation += 1;
                session.last_applied_seq = seq;
                session.state = SessionState::DatasetLoaded;
                Some(job_id.filter(|_| was_solving))
            }
        };

        let Some(abandoned) = abandoned else {
            debug!(dataset = %dataset_id, seq, "Dataset load superseded by a later selection");
            return Ok(());
        };

        self.inner.analyzer.clear();
        if let Some(job_id) = abandoned {
            info!(job_id = %job_id, "Terminating job abandoned by dataset reselect");
            self.terminate_in_background(job_id);
        }
        info!(dataset = %dataset_id, "Dataset loaded");
        self.emit(SessionEvent::ScheduleReplaced);
        self.emit(SessionEvent::AnalysisUpdated);
        self.emit_state();
        Ok(())
    }

    /// Starts solving the loaded schedule with the registered weights.
    pub async fn solve(&self) -> Result<String> {
        let weights = self.weights();
        self.solve_with(weights).await
    }

    /// Starts solving the loaded schedule with `weights` and returns the
    /// job handle. Polling starts one interval later.
    pub async fn solve_with(&self, weights: ConstraintWeights) -> Result<String> {
        let prepared = {
            let mut session = self.inner.session.lock();
            if session.state == SessionState::Solving || session.solve_pending {
                Err(SolveStartError::AlreadySolving)
            } else if let Some(schedule) = session.schedule.clone() {
                session.solve_pending = true;
                Ok((SolveRequest::new(schedule, weights), session.generation))
            } else {
                Err(SolveStartError::NoSchedule)
            }
        };
        let (request, generation) = prepared.map_err(|e| self.fail(e.into()))?;

        info!(
            tasks = request.schedule.tasks.len(),
            resources = request.schedule.resources.len(),
            "Starting solve"
        );
        let job_id = match self.inner.api.start_solving(&request).await {
            Ok(job_id) => job_id,
            Err(err) => {
                self.inner.session.lock().solve_pending = false;
                self.emit_state();
                return Err(self.fail(SolveStartError::Api(err).into()));
            }
        };

        let superseded = {
            let mut session = self.inner.session.lock();
            session.solve_pending = false;
            if session.generation != generation {
                true
            } else {
                session.schedule_id = Some(job_id.clone());
                session.state = SessionState::Solving;
                session.generation += 1;
                session.poll = Some(PollHandle::spawn(
                    Arc::downgrade(&self.inner),
                    job_id.clone(),
                    self.inner.poll_interval,
                ));
                false
            }
        };

        if superseded {
            self.terminate_in_background(job_id);
            return Err(self.fail(SolveStartError::Superseded.into()));
        }

        info!(job_id = %job_id, "Solving started");
        self.emit_state();
        Ok(job_id)
    }

    /// Stops the active job.
    ///
    /// The session leaves Solving before the termination request is sent,
    /// and stays out of it even if that request fails; the failure is only
    /// reported as a warning. A final fetch then captures the last solution.
    pub async fn stop(&self) -> Result<StopOutcome> {
        let job_id = {
            let mut session = self.inner.session.lock();
            let job_id = session.schedule_id.clone();
            if job_id.is_some() {
                session.stop_polling();
                if session.state == SessionState::Solving {
                    session.state = SessionState::DatasetLoaded;
                }
            }
            job_id
        };
        let Some(job_id) = job_id else {
            return Err(self.fail(SessionError::NoActiveJob));
        };
        info!(job_id = %job_id, "Stopping solve");
        self.emit_state();

        let terminated = match self.inner.api.stop_solving(&job_id).await {
            Ok(()) => true,
            Err(err) => {
                let err = SessionError::Stop(err);
                warn!(job_id = %job_id, error = %err, "Termination request failed");
                self.notify(
                    Notification::warning(err.title(), err.to_string())
                        .with_info(err.error_info().cloned()),
                );
                false
            }
        };

        let final_fetch = self.refresh().await.ok();
        Ok(StopOutcome {
            job_id,
            terminated,
            final_fetch,
        })
    }

    /// Re-fetches the active job, or the selected dataset when no job was
    /// started, and replaces the local schedule with it.
    pub async fn refresh(&self) -> Result<RefreshOutcome> {
        let (target, generation, seq) = {
            let mut session = self.inner.session.lock();
            let target = match (&session.schedule_id, &session.demo_data_id) {
                (Some(job_id), _) => Some(FetchTarget::Job(job_id.clone())),
                (None, Some(dataset_id)) => Some(FetchTarget::Dataset(dataset_id.clone())),
                (None, None) => None,
            };
            (target, session.generation, session.next_seq())
        };

        let Some(target) = target else {
            warn!("Nothing to refresh");
            self.notify(Notification::warning(
                "Nothing to refresh",
                "Select a dataset before refreshing",
            ));
            return Ok(RefreshOutcome::NothingToRefresh);
        };

        let fetched = match &target {
            FetchTarget::Job(job_id) => {
                debug!(job_id = %job_id, seq, "Fetching job");
                self.inner.api.fetch_schedule(job_id).await
            }
            FetchTarget::Dataset(dataset_id) => {
                debug!(dataset = %dataset_id, seq, "Fetching dataset");
                self.inner.api.fetch_demo_data(dataset_id).await.map(|mut s| {
                    s.score = None;
                    s.solver_status = SolverStatus::NotSolving;
                    s
                })
            }
        };

        match fetched {
            Ok(schedule) => Ok(self.apply_fetched(schedule, generation, seq)),
            Err(err) => Err(self.fail(SessionError::DataLoad(err))),
        }
    }

    /// Requests a score breakdown of the current schedule.
    pub async fn analyze(&self) -> Result<ScoreAnalysis> {
        let snapshot = {
            let session = self.inner.session.lock();
            session.schedule.clone()
        };
        let result = self
            .inner
            .analyzer
            .analyze(&self.inner.api, snapshot.as_ref())
            .await;
        self.emit(SessionEvent::AnalysisUpdated);
        result.map_err(|err| self.fail(err.into()))
    }

    // ---- local edits ----

    pub fn add_resource(&self, resource: Resource) -> Result<()> {
        self.edit(|schedule| schedule.add_resource(resource))
    }

    /// Removes a resource; tasks assigned to it become unassigned.
    pub fn remove_resource(&self, name: &str) -> Result<Resource> {
        let (removed, warning) = self.edit(|schedule| schedule.remove_resource(name))?;
        if let Some(warning) = warning {
            info!(
                resource = %warning.resource,
                tasks = warning.unassigned_tasks.len(),
                "Unassigned tasks of removed resource"
            );
            self.notify(Notification::info("Tasks unassigned", warning.to_string()));
        }
        Ok(removed)
    }

    /// Adds a task and returns its generated id.
    pub fn add_task(&self, task: NewTask) -> Result<String> {
        self.edit(|schedule| schedule.add_task(task))
    }

    pub fn remove_task(&self, id: &str) -> Result<Task> {
        self.edit(|schedule| schedule.remove_task(id))
    }

    fn edit<T>(
        &self,
        f: impl FnOnce(&mut Schedule) -> std::result::Result<T, EditError>,
    ) -> Result<T> {
        let result = {
            let mut session = self.inner.session.lock();
            if session.state == SessionState::Solving || session.solve_pending {
                Err(EditError::SolveInProgress)
            } else {
                match session.schedule.as_mut() {
                    Some(schedule) => f(schedule),
                    None => Err(EditError::NoSchedule),
                }
            }
        };
        match result {
            Ok(value) => {
                self.emit(SessionEvent::ScheduleEdited);
                Ok(value)
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    // ---- internals ----

    fn apply_fetched(&self, schedule: Schedule, generation: u64, seq: u64) -> RefreshOutcome {
        let terminal = {
            let mut session = self.inner.session.lock();
            if session.generation != generation || seq <= session.last_applied_seq {
                debug!(
                    seq,
                    last_applied = session.last_applied_seq,
                    "Discarding stale schedule"
                );
                return RefreshOutcome::Discarded;
            }
            session.last_applied_seq = seq;

            let terminal = session.state == SessionState::Solving
                && schedule.solver_status == SolverStatus::NotSolving;
            debug!(seq, score = %taskforge_core::format_score(schedule.score.as_ref()), "Applying schedule");
            session.schedule = Some(schedule);
            if terminal {
                session.stop_polling();
                session.state = SessionState::DatasetLoaded;
            }
            terminal
        };

        self.emit(SessionEvent::ScheduleReplaced);
        if terminal {
            info!("Solver finished");
            self.emit_state();
        }
        RefreshOutcome::Applied { terminal }
    }

    fn terminate_in_background(&self, job_id: String) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            if let Err(err) = inner.api.stop_solving(&job_id).await {
                warn!(job_id = %job_id, error = %err, "Failed to terminate abandoned job");
            }
        });
    }

    /// Logs `err`, publishes it as a notification and hands it back.
    fn fail(&self, err: SessionError) -> SessionError {
        match &err {
            SessionError::Edit(_) | SessionError::NoActiveJob => {
                warn!(error = %err, "{}", err.title())
            }
            _ => error!(error = %err, "{}", err.title()),
        }
        self.notify(Notification::from_error(&err));
        err
    }

    fn notify(&self, notification: Notification) {
        self.emit(SessionEvent::Notification(notification));
    }

    fn emit_state(&self) {
        let state = self.state();
        self.emit(SessionEvent::StateChanged {
            state,
            solving: state == SessionState::Solving,
        });
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }
}
