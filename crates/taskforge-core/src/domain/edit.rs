//! Local edits applied directly to a [`Schedule`].
//!
//! Edits are never sent to the server incrementally; the whole schedule is
//! resent on the next solve. Every edit leaves the schedule referentially
//! intact: no task references a resource that is not in the schedule.

use std::fmt;

use tracing::{debug, warn};

use super::{Resource, Schedule, Task};
use crate::error::EditError;

/// Prefix of generated task ids.
const TASK_ID_PREFIX: &str = "task-";

/// Tasks that lost their assignment because the resource they pointed at is gone.
///
/// This is corrected automatically and reported for information only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferentialIntegrityWarning {
    pub resource: String,
    pub unassigned_tasks: Vec<String>,
}

impl fmt::Display for ReferentialIntegrityWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unassigned {} task(s) from removed resource '{}': {}",
            self.unassigned_tasks.len(),
            self.resource,
            self.unassigned_tasks.join(", ")
        )
    }
}

/// Input for [`Schedule::add_task`]; the id is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub duration: u32,
    pub required_skill: String,
    pub resource: Option<String>,
}

impl NewTask {
    pub fn new(name: impl Into<String>, duration: u32) -> Self {
        Self {
            name: name.into(),
            duration,
            required_skill: String::new(),
            resource: None,
        }
    }

    pub fn with_required_skill(mut self, skill: impl Into<String>) -> Self {
        self.required_skill = skill.into().trim().to_lowercase();
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }
}

impl Schedule {
    /// Adds a resource. Names are unique; a duplicate is rejected and the
    /// schedule is left untouched.
    pub fn add_resource(&mut self, resource: Resource) -> Result<(), EditError> {
        if self.resource(&resource.name).is_some() {
            return Err(EditError::DuplicateResource {
                name: resource.name,
            });
        }
        debug!(resource = %resource.name, capacity = resource.capacity, "Adding resource");
        self.resources.push(resource);
        Ok(())
    }

    /// Removes a resource and unassigns every task that referenced it.
    pub fn remove_resource(
        &mut self,
        name: &str,
    ) -> Result<(Resource, Option<ReferentialIntegrityWarning>), EditError> {
        let index = self
            .resources
            .iter()
            .position(|r| r.name == name)
            .ok_or_else(|| EditError::UnknownResource {
                name: name.to_string(),
            })?;
        let removed = self.resources.remove(index);
        debug!(resource = %removed.name, "Removed resource");
        let warning = self.enforce_referential_integrity();
        Ok((removed, warning))
    }

    /// Adds a task under a freshly generated id and returns that id.
    pub fn add_task(&mut self, new_task: NewTask) -> Result<String, EditError> {
        if new_task.duration == 0 {
            return Err(EditError::InvalidDuration {
                name: new_task.name,
            });
        }
        if let Some(resource) = new_task.resource.as_deref() {
            if self.resource(resource).is_none() {
                return Err(EditError::UnknownResource {
                    name: resource.to_string(),
                });
            }
        }

        let id = self.next_task_id();
        debug!(task = %id, name = %new_task.name, duration = new_task.duration, "Adding task");
        self.tasks.push(Task {
            id: id.clone(),
            name: new_task.name,
            duration: new_task.duration,
            required_skill: new_task.required_skill,
            resource: new_task.resource,
        });
        Ok(id)
    }

    /// Removes a task by id.
    pub fn remove_task(&mut self, id: &str) -> Result<Task, EditError> {
        let index = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| EditError::UnknownTask { id: id.to_string() })?;
        Ok(self.tasks.remove(index))
    }

    /// Returns the next free `task-{n}` id.
    ///
    /// Counting starts after the current task count and skips ids already
    /// taken, so ids stay unique even after removals.
    pub fn next_task_id(&self) -> String {
        let mut n = self.tasks.len() + 1;
        loop {
            let candidate = format!("{TASK_ID_PREFIX}{n}");
            if self.task(&candidate).is_none() {
                return candidate;
            }
            n += 1;
        }
    }

    /// Resets every task reference that names a missing resource.
    ///
    /// Returns a warning listing the affected tasks, or `None` when the
    /// schedule was already consistent.
    pub fn enforce_referential_integrity(&mut self) -> Option<ReferentialIntegrityWarning> {
        let known: Vec<String> = self.resources.iter().map(|r| r.name.clone()).collect();
        let mut dangling_resource = None;
        let mut unassigned = Vec::new();

        for task in &mut self.tasks {
            let Some(name) = task.resource.as_deref() else {
                continue;
            };
            if known.iter().any(|k| k == name) {
                continue;
            }
            dangling_resource.get_or_insert_with(|| name.to_string());
            unassigned.push(task.id.clone());
            task.resource = None;
        }

        let resource = dangling_resource?;
        let warning = ReferentialIntegrityWarning {
            resource,
            unassigned_tasks: unassigned,
        };
        warn!(%warning, "Referential integrity corrected");
        Some(warning)
    }
}
