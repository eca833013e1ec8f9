//! Compact schedule construction for tests.

use taskforge_core::{Resource, Schedule, Score, SolverStatus, Task};

/// Builds a [`Schedule`] one resource or task at a time.
#[derive(Clone, Debug, Default)]
pub struct ScheduleBuilder {
    schedule: Schedule,
}

impl ScheduleBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing schedule, e.g. a demo dataset.
    pub fn from_schedule(schedule: Schedule) -> Self {
        Self { schedule }
    }

    pub fn resource(mut self, name: &str, capacity: u32, skills: &[&str]) -> Self {
        self.schedule
            .resources
            .push(Resource::new(name, capacity, skills.iter().copied()));
        self
    }

    /// Adds an unassigned task. Pass `""` for no skill requirement.
    pub fn task(mut self, id: &str, duration: u32, skill: &str) -> Self {
        self.schedule.tasks.push(Task::new(id, id, duration, skill));
        self
    }

    pub fn assigned_task(mut self, id: &str, duration: u32, skill: &str, resource: &str) -> Self {
        self.schedule
            .tasks
            .push(Task::new(id, id, duration, skill).assigned_to(resource));
        self
    }

    pub fn score(mut self, score: Score) -> Self {
        self.schedule.score = Some(score);
        self
    }

    pub fn solving(mut self) -> Self {
        self.schedule.solver_status = SolverStatus::Solving;
        self
    }

    /// Assigns every task round-robin across resources, as a stand-in for a
    /// solver result.
    pub fn assign_round_robin(mut self) -> Self {
        let names: Vec<String> = self
            .schedule
            .resources
            .iter()
            .map(|r| r.name.clone())
            .collect();
        if !names.is_empty() {
            for (i, task) in self.schedule.tasks.iter_mut().enumerate() {
                task.resource = Some(names[i % names.len()].clone());
            }
        }
        self
    }

    pub fn build(self) -> Schedule {
        self.schedule
    }
}
