//! Tunable constraint weights.
//!
//! The set of constraints is closed: [`ConstraintKey`] lists every weight the
//! solver service understands. Weights are read once when a solve starts and
//! travel with the schedule as `constraintWeights`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowest weight offered by the weight controls.
pub const WEIGHT_MIN: i32 = 0;
/// Highest weight offered by the weight controls.
pub const WEIGHT_MAX: i32 = 100;

/// Whether a constraint affects feasibility or only quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstraintType {
    Hard,
    Soft,
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintType::Hard => f.write_str("hard"),
            ConstraintType::Soft => f.write_str("soft"),
        }
    }
}

/// The constraints whose weight can be tuned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKey {
    RequiredSkill,
    ResourceCapacity,
    MinimizeDuration,
    BalanceLoad,
}

impl ConstraintKey {
    pub const ALL: [ConstraintKey; 4] = [
        ConstraintKey::RequiredSkill,
        ConstraintKey::ResourceCapacity,
        ConstraintKey::MinimizeDuration,
        ConstraintKey::BalanceLoad,
    ];

    /// Key used in configuration files and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            ConstraintKey::RequiredSkill => "required_skill",
            ConstraintKey::ResourceCapacity => "resource_capacity",
            ConstraintKey::MinimizeDuration => "minimize_duration",
            ConstraintKey::BalanceLoad => "balance_load",
        }
    }

    /// Constraint name as reported by score analysis.
    pub fn constraint_name(self) -> &'static str {
        match self {
            ConstraintKey::RequiredSkill => "Required skill missing",
            ConstraintKey::ResourceCapacity => "Resource capacity exceeded",
            ConstraintKey::MinimizeDuration => "Minimize total duration",
            ConstraintKey::BalanceLoad => "Balance resource load",
        }
    }

    pub fn constraint_type(self) -> ConstraintType {
        match self {
            ConstraintKey::RequiredSkill | ConstraintKey::ResourceCapacity => ConstraintType::Hard,
            ConstraintKey::MinimizeDuration | ConstraintKey::BalanceLoad => ConstraintType::Soft,
        }
    }

    pub fn default_weight(self) -> i32 {
        match self.constraint_type() {
            ConstraintType::Hard => 100,
            ConstraintType::Soft => 50,
        }
    }

    /// Finds the key whose analysis name is `name`.
    pub fn from_constraint_name(name: &str) -> Option<ConstraintKey> {
        Self::ALL.into_iter().find(|k| k.constraint_name() == name)
    }
}

impl fmt::Display for ConstraintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Error for an unrecognized constraint key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown constraint '{0}', expected one of: required_skill, resource_capacity, minimize_duration, balance_load")]
pub struct UnknownConstraint(pub String);

impl FromStr for ConstraintKey {
    type Err = UnknownConstraint;

    /// Accepts the snake_case key or the camelCase wire name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "required_skill" | "requiredSkill" => Ok(ConstraintKey::RequiredSkill),
            "resource_capacity" | "resourceCapacity" => Ok(ConstraintKey::ResourceCapacity),
            "minimize_duration" | "minimizeDuration" => Ok(ConstraintKey::MinimizeDuration),
            "balance_load" | "balanceLoad" => Ok(ConstraintKey::BalanceLoad),
            other => Err(UnknownConstraint(other.to_string())),
        }
    }
}

/// Current weight of every tunable constraint.
///
/// Values outside `[WEIGHT_MIN, WEIGHT_MAX]` are stored and sent as given;
/// the range only bounds what interactive controls offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintWeights {
    pub required_skill: i32,
    pub resource_capacity: i32,
    pub minimize_duration: i32,
    pub balance_load: i32,
}

impl Default for ConstraintWeights {
    fn default() -> Self {
        Self {
            required_skill: ConstraintKey::RequiredSkill.default_weight(),
            resource_capacity: ConstraintKey::ResourceCapacity.default_weight(),
            minimize_duration: ConstraintKey::MinimizeDuration.default_weight(),
            balance_load: ConstraintKey::BalanceLoad.default_weight(),
        }
    }
}

impl ConstraintWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ConstraintKey) -> i32 {
        match key {
            ConstraintKey::RequiredSkill => self.required_skill,
            ConstraintKey::ResourceCapacity => self.resource_capacity,
            ConstraintKey::MinimizeDuration => self.minimize_duration,
            ConstraintKey::BalanceLoad => self.balance_load,
        }
    }

    pub fn set(&mut self, key: ConstraintKey, weight: i32) {
        *self.slot(key) = weight;
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, key: ConstraintKey, weight: i32) -> Self {
        self.set(key, weight);
        self
    }

    /// Restores one weight to its default.
    pub fn reset(&mut self, key: ConstraintKey) {
        self.set(key, key.default_weight());
    }

    /// Restores every weight to its default.
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Returns true if the weight disables its constraint.
    pub fn is_disabled(&self, key: ConstraintKey) -> bool {
        self.get(key) == 0
    }

    /// Iterates `(key, weight)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (ConstraintKey, i32)> + '_ {
        ConstraintKey::ALL.into_iter().map(move |k| (k, self.get(k)))
    }

    fn slot(&mut self, key: ConstraintKey) -> &mut i32 {
        match key {
            ConstraintKey::RequiredSkill => &mut self.required_skill,
            ConstraintKey::ResourceCapacity => &mut self.resource_capacity,
            ConstraintKey::MinimizeDuration => &mut self.minimize_duration,
            ConstraintKey::BalanceLoad => &mut self.balance_load,
        }
    }
}
