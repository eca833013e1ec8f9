//! Derived metrics computed locally from a [`Schedule`].
//!
//! These numbers are an approximate mirror of the server's score, covering
//! only the skill and capacity rules. They keep the display responsive
//! between poll ticks and must not be presented as the solver's score.

use serde::Serialize;

use crate::domain::Schedule;

/// Load of a single resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLoad {
    pub name: String,
    pub capacity: u32,
    /// Sum of assigned task durations.
    pub load: u64,
    pub task_count: usize,
}

impl ResourceLoad {
    /// Load as a fraction of capacity. A zero-capacity resource with any load
    /// reports infinity; with no load, zero.
    pub fn utilization(&self) -> f64 {
        if self.capacity == 0 {
            return if self.load == 0 { 0.0 } else { f64::INFINITY };
        }
        self.load as f64 / f64::from(self.capacity)
    }

    pub fn is_overloaded(&self) -> bool {
        self.load > u64::from(self.capacity)
    }
}

/// Key performance indicators of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleMetrics {
    pub total_tasks: usize,
    pub assigned_tasks: usize,
    /// Assigned tasks whose resource lacks the required skill.
    pub skill_mismatches: usize,
    /// Resources loaded beyond their capacity.
    pub capacity_overflows: usize,
    pub resources: Vec<ResourceLoad>,
}

impl ScheduleMetrics {
    pub fn unassigned_tasks(&self) -> usize {
        self.total_tasks - self.assigned_tasks
    }

    /// Skill mismatches plus capacity overflows.
    pub fn violation_count(&self) -> usize {
        self.skill_mismatches + self.capacity_overflows
    }
}

impl Schedule {
    /// Computes the local KPIs for this schedule.
    pub fn metrics(&self) -> ScheduleMetrics {
        // A reference to a missing resource counts as unassigned.
        let assigned_tasks = self
            .tasks
            .iter()
            .filter(|t| self.assigned_resource(t).is_some())
            .count();

        let skill_mismatches = self
            .tasks
            .iter()
            .filter(|task| task.required_skill().is_some())
            .filter_map(|task| self.assigned_resource(task).map(|r| (task, r)))
            .filter(|(task, resource)| !task.is_skill_satisfied_by(resource))
            .count();

        let resources: Vec<ResourceLoad> = self
            .resources
            .iter()
            .map(|r| ResourceLoad {
                name: r.name.clone(),
                capacity: r.capacity,
                load: self.load_of(&r.name),
                task_count: self.tasks_of(&r.name).count(),
            })
            .collect();

        let capacity_overflows = resources.iter().filter(|r| r.is_overloaded()).count();

        ScheduleMetrics {
            total_tasks: self.tasks.len(),
            assigned_tasks,
            skill_mismatches,
            capacity_overflows,
            resources,
        }
    }

    /// Shorthand for `self.metrics().violation_count()`.
    pub fn violation_count(&self) -> usize {
        self.metrics().violation_count()
    }
}
