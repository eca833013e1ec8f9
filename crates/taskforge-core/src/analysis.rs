//! Constraint-by-constraint score breakdown returned by the analysis endpoint.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};

use crate::score::Score;
use crate::weights::ConstraintType;

/// One match of a constraint, kept as the server reported it.
///
/// The score stays text: the server formats it from whatever the match
/// carries, which is not always a valid score.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchAnalysis {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(default)]
    pub justification: String,
}

/// Breakdown of a single constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintAnalysis {
    pub name: String,
    /// `None` when missing or not a valid score.
    #[serde(default, deserialize_with = "deserialize_weight")]
    pub weight: Option<Score>,
    #[serde(default)]
    pub score: Score,
    #[serde(default)]
    pub matches: Vec<MatchAnalysis>,
}

impl ConstraintAnalysis {
    /// Hard when the weight carries a hard component; without a usable
    /// weight, hard when the score does.
    pub fn constraint_type(&self) -> ConstraintType {
        match self.weight {
            Some(w) if !w.hard().is_zero() => ConstraintType::Hard,
            Some(w) if !w.is_zero() => ConstraintType::Soft,
            _ if !self.score.hard().is_zero() => ConstraintType::Hard,
            _ => ConstraintType::Soft,
        }
    }

    /// True when the constraint breaks feasibility.
    pub fn is_violated_hard(&self) -> bool {
        self.score.breaks_hard()
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

/// Ordered score breakdown.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreAnalysis {
    #[serde(default)]
    pub constraints: Vec<ConstraintAnalysis>,
}

impl ScoreAnalysis {
    /// Sorts constraints so the most severe problems come first.
    ///
    /// Violated hard constraints lead, by descending hard magnitude; the rest
    /// follow by descending soft magnitude. Ties keep server order.
    pub fn sort_by_severity(&mut self) {
        self.constraints.sort_by(compare_severity);
    }

    /// Returns the analysis sorted by [`sort_by_severity`](Self::sort_by_severity).
    pub fn sorted(mut self) -> Self {
        self.sort_by_severity();
        self
    }

    pub fn violated_hard(&self) -> impl Iterator<Item = &ConstraintAnalysis> {
        self.constraints.iter().filter(|c| c.is_violated_hard())
    }

    pub fn constraint(&self, name: &str) -> Option<&ConstraintAnalysis> {
        self.constraints.iter().find(|c| c.name == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.constraints.iter().map(|c| c.name.as_str()).collect()
    }
}

fn deserialize_weight<'de, D>(deserializer: D) -> Result<Option<Score>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.and_then(|t| t.parse().ok()))
}

fn compare_severity(a: &ConstraintAnalysis, b: &ConstraintAnalysis) -> Ordering {
    match (a.is_violated_hard(), b.is_violated_hard()) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => b.score.hard().abs().cmp(&a.score.hard().abs()),
        (false, false) => b.score.soft().abs().cmp(&a.score.soft().abs()),
    }
}
