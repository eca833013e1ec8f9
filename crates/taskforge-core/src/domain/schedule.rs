use serde::{Deserialize, Deserializer, Serialize};

use super::{Resource, Task};
use crate::score::Score;

/// Status of a solving job as reported by the solver service.
///
/// Serialized as `NOT_SOLVING` or `SOLVING`. Decoding accepts any status
/// name the server's solver manager reports; see [`SolverStatus::from_name`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SolverStatus {
    #[default]
    NotSolving,
    Solving,
}

impl SolverStatus {
    /// Maps a server status name. `NOT_SOLVING` and `TERMINATED` mean the job
    /// is done; every other name counts as still solving.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "NOT_SOLVING" | "TERMINATED" => SolverStatus::NotSolving,
            _ => SolverStatus::Solving,
        }
    }
}

impl<'de> Deserialize<'de> for SolverStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = Option::<String>::deserialize(deserializer)?;
        Ok(name.map_or(SolverStatus::NotSolving, |n| SolverStatus::from_name(&n)))
    }
}

/// The planning solution: all resources, all tasks, and the solver's verdict.
///
/// A schedule fetched from the server is never merged into an existing one;
/// it replaces it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub tasks: Vec<Task>,
    /// `None` until the solver has scored the schedule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<Score>,
    #[serde(default)]
    pub solver_status: SolverStatus,
}

impl Schedule {
    /// Creates an unscored, not-solving schedule.
    pub fn new(resources: Vec<Resource>, tasks: Vec<Task>) -> Self {
        Self {
            resources,
            tasks,
            score: None,
            solver_status: SolverStatus::NotSolving,
        }
    }

    /// Looks up a resource by name.
    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Looks up a task by id.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Resolves a task's resource reference against the current resource set.
    ///
    /// Returns `None` for unassigned tasks and for references to resources
    /// that no longer exist.
    pub fn assigned_resource(&self, task: &Task) -> Option<&Resource> {
        task.resource.as_deref().and_then(|name| self.resource(name))
    }

    /// Iterates the tasks assigned to the named resource.
    pub fn tasks_of<'a>(&'a self, resource_name: &'a str) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks
            .iter()
            .filter(move |t| t.resource.as_deref() == Some(resource_name))
    }

    /// Sum of the durations of the tasks assigned to the named resource.
    pub fn load_of(&self, resource_name: &str) -> u64 {
        self.tasks_of(resource_name).map(|t| u64::from(t.duration)).sum()
    }

    pub fn is_solving(&self) -> bool {
        self.solver_status == SolverStatus::Solving
    }
}
