//! Parsing of the solver service's score strings.

use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

use super::Score;

/// Error when parsing a score from string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Score parse error: {message}")]
pub struct ScoreParseError {
    pub message: String,
}

impl ScoreParseError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl FromStr for Score {
    type Err = ScoreParseError;

    /// Parses `{h}hard/{s}soft` or `{h}hard/{m}medium/{s}soft`.
    ///
    /// A leading `{n}init` part (uninitialized solutions) is accepted and dropped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut parts: Vec<&str> = s.split('/').map(str::trim).collect();
        if parts.first().is_some_and(|p| p.ends_with("init")) {
            parts.remove(0);
        }

        match parts.as_slice() {
            [hard, soft] => Ok(Score::from_decimals(
                component(hard, "hard")?,
                None,
                component(soft, "soft")?,
            )),
            [hard, medium, soft] => Ok(Score::from_decimals(
                component(hard, "hard")?,
                Some(component(medium, "medium")?),
                component(soft, "soft")?,
            )),
            _ => Err(ScoreParseError::new(format!(
                "Invalid score format '{}': expected 2 or 3 parts separated by '/'",
                s
            ))),
        }
    }
}

fn component(part: &str, suffix: &str) -> Result<Decimal, ScoreParseError> {
    let num_str = part.strip_suffix(suffix).ok_or_else(|| {
        ScoreParseError::new(format!("{} part '{}' must end with '{}'", suffix, part, suffix))
    })?;
    Decimal::from_str(num_str)
        .map_err(|e| ScoreParseError::new(format!("Invalid {} score '{}': {}", suffix, num_str, e)))
}
