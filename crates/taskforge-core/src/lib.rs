//! TaskForge Core - Schedule model and derived views for the quickstart client
//!
//! This crate provides the data the solving session works on:
//! - Domain types for the task assignment problem and local edits
//! - Score types parsed from the solver service's string form
//! - The constraint weight registry sent with every solve
//! - Locally derived metrics and the score analysis breakdown

pub mod analysis;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod score;
pub mod weights;


pub use analysis::{ConstraintAnalysis, MatchAnalysis, ScoreAnalysis};
pub use domain::{NewTask, ReferentialIntegrityWarning, Resource, Schedule, SolverStatus, Task};
pub use error::EditError;
pub use metrics::{ResourceLoad, ScheduleMetrics};
pub use score::{format_score, Score, ScoreLevel, ScoreParseError};
pub use weights::{ConstraintKey, ConstraintType, ConstraintWeights, UnknownConstraint};
