use serde::{Deserialize, Serialize};

use super::Resource;

/// A task to be assigned to a resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub name: String,
    /// Duration in the same units as [`Resource::capacity`].
    pub duration: u32,
    /// Empty means no skill is required.
    #[serde(default)]
    pub required_skill: String,
    /// Name of the assigned resource, if any.
    #[serde(default)]
    pub resource: Option<String>,
}

impl Task {
    /// Creates an unassigned task.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        duration: u32,
        required_skill: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration,
            required_skill: required_skill.into(),
            resource: None,
        }
    }

    /// Returns this task assigned to the named resource.
    pub fn assigned_to(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn is_assigned(&self) -> bool {
        self.resource.is_some()
    }

    /// Returns the required skill, or `None` when the task has no requirement.
    pub fn required_skill(&self) -> Option<&str> {
        let skill = self.required_skill.trim();
        (!skill.is_empty()).then_some(skill)
    }

    /// Returns true if `resource` can perform this task.
    ///
    /// Tasks without a required skill fit any resource.
    pub fn is_skill_satisfied_by(&self, resource: &Resource) -> bool {
        match self.required_skill() {
            Some(skill) => resource.has_skill(&skill.to_lowercase()),
            None => true,
        }
    }
}
