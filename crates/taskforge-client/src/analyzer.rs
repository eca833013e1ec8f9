//! Score analysis requests and the view they produce.

use parking_lot::Mutex;
use taskforge_core::{Schedule, ScoreAnalysis};
use tracing::{debug, warn};

use crate::api::SolverApi;
use crate::error::AnalysisError;

/// What the analysis panel currently shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AnalysisView {
    /// Nothing requested for the current schedule.
    #[default]
    Empty,
    /// A request is in flight.
    Pending,
    /// Constraints sorted by severity.
    Ready(ScoreAnalysis),
    /// The last request failed. Replaces any earlier result.
    Failed(String),
}

impl AnalysisView {
    pub fn is_ready(&self) -> bool {
        matches!(self, AnalysisView::Ready(_))
    }

    pub fn analysis(&self) -> Option<&ScoreAnalysis> {
        match self {
            AnalysisView::Ready(analysis) => Some(analysis),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct ViewState {
    view: AnalysisView,
    // Bumped by `clear` and by each new request; a response only lands if
    // nothing happened in between.
    epoch: u64,
}

/// Requests score breakdowns from the solver service.
#[derive(Debug, Default)]
pub struct ScoreAnalyzer {
    state: Mutex<ViewState>,
}

impl ScoreAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AnalysisView {
        self.state.lock().view.clone()
    }

    /// Forgets the current result, e.g. after a different dataset is loaded.
    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.epoch += 1;
        state.view = AnalysisView::Empty;
    }

    /// Analyzes `schedule` and returns its constraints sorted by severity.
    ///
    /// Violated hard constraints come first (largest magnitude first), then
    /// the rest by descending soft magnitude.
    pub async fn analyze<A: SolverApi>(
        &self,
        api: &A,
        schedule: Option<&Schedule>,
    ) -> Result<ScoreAnalysis, AnalysisError> {
        let Some(schedule) = schedule else {
            self.set_failed(None, "no schedule is loaded");
            return Err(AnalysisError::NoSchedule);
        };

        let epoch = {
            let mut state = self.state.lock();
            state.epoch += 1;
            state.view = AnalysisView::Pending;
            state.epoch
        };

        match api.analyze(schedule).await {
            Ok(analysis) => {
                let analysis = analysis.sorted();
                debug!(
                    constraints = analysis.constraints.len(),
                    violated_hard = analysis.violated_hard().count(),
                    "Score analysis received"
                );
                let mut state = self.state.lock();
                if state.epoch == epoch {
                    state.view = AnalysisView::Ready(analysis.clone());
                }
                Ok(analysis)
            }
            Err(err) => {
                warn!(error = %err, "Score analysis failed");
                self.set_failed(Some(epoch), &err.to_string());
                Err(AnalysisError::Api(err))
            }
        }
    }

    fn set_failed(&self, epoch: Option<u64>, message: &str) {
        let mut state = self.state.lock();
        if epoch.map_or(true, |e| e == state.epoch) {
            state.view = AnalysisView::Failed(message.to_string());
        }
    }
}
