//! Score types for representing solution quality
//!
//! The solver service reports scores as strings such as `-2hard/-15soft` or
//! `0hard/-3medium/-120soft`. This module parses those strings into a
//! structured [`Score`] and formats them back for display.

mod parse;
mod value;


pub use parse::ScoreParseError;
pub use value::Score;

/// Placeholder shown when a schedule has not been scored yet.
pub const UNSCORED: &str = "?";

/// Score level representing different constraint priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScoreLevel {
    /// Hard constraints - must be satisfied for feasibility
    Hard,
    /// Medium constraints - secondary priority
    Medium,
    /// Soft constraints - optimization objectives
    Soft,
}

/// Formats an optional score for display, using `?` for a missing score.
///
/// # Examples
///
/// ```
/// use taskforge_core::score::{format_score, Score};
///
/// assert_eq!(format_score(None), "?");
/// assert_eq!(format_score(Some(&Score::of(-2, -15))), "-2hard/-15soft");
/// ```
pub fn format_score(score: Option<&Score>) -> String {
    match score {
        Some(score) => score.to_string(),
        None => UNSCORED.to_string(),
    }
}
