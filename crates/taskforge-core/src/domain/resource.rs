use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Default capacity for resources whose payload omits it.
pub const DEFAULT_CAPACITY: u32 = 100;

fn default_capacity() -> u32 {
    DEFAULT_CAPACITY
}

/// A resource that tasks can be assigned to.
///
/// The name is the identity key: tasks point at a resource by name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    /// Capacity in duration units.
    #[serde(default = "default_capacity")]
    pub capacity: u32,
    #[serde(default, deserialize_with = "deserialize_skills")]
    pub skills: BTreeSet<String>,
}

impl Resource {
    /// Creates a resource, normalizing skills to trimmed lowercase and
    /// dropping empty entries.
    pub fn new<I, S>(name: impl Into<String>, capacity: u32, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.into(),
            capacity,
            skills: normalize_skills(skills),
        }
    }

    /// Returns true if the resource has the given skill.
    pub fn has_skill(&self, skill: &str) -> bool {
        self.skills.contains(skill)
    }
}

fn normalize_skills<I, S>(skills: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    skills
        .into_iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

// Server payloads get the same normalization as locally built resources.
fn deserialize_skills<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let skills = Vec::<String>::deserialize(deserializer)?;
    Ok(normalize_skills(skills))
}
