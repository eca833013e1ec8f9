//! Score - hard/(medium)/soft score as reported by the solver service

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ScoreLevel;

/// A score with hard, optional medium, and soft levels.
///
/// Components are decimals so that both `-2hard/-15soft` and
/// `-1.5hard/-0.25soft` round-trip without loss. The medium level is only
/// present when the server reported a three-level score.
///
/// When comparing scores:
/// 1. Hard scores are compared first
/// 2. Medium scores (missing counts as zero) when hard scores are equal
/// 3. Soft scores last
///
/// # Examples
///
/// ```
/// use taskforge_core::Score;
///
/// let score1 = Score::of(-1, -100);  // 1 hard constraint broken
/// let score2 = Score::of(0, -200);   // Feasible but poor soft score
///
/// assert!(score2 > score1);
/// assert!(score2.is_feasible());
/// ```
#[derive(Clone, Copy, Default)]
pub struct Score {
    hard: Decimal,
    medium: Option<Decimal>,
    soft: Decimal,
}

impl Score {
    /// The zero score.
    pub const ZERO: Score = Score {
        hard: Decimal::ZERO,
        medium: None,
        soft: Decimal::ZERO,
    };

    /// Creates a two-level score from integer components.
    pub fn of(hard: i64, soft: i64) -> Self {
        Score {
            hard: Decimal::from(hard),
            medium: None,
            soft: Decimal::from(soft),
        }
    }

    /// Creates a three-level score from integer components.
    pub fn of_medium(hard: i64, medium: i64, soft: i64) -> Self {
        Score {
            hard: Decimal::from(hard),
            medium: Some(Decimal::from(medium)),
            soft: Decimal::from(soft),
        }
    }

    /// Creates a score from decimal components.
    pub fn from_decimals(hard: Decimal, medium: Option<Decimal>, soft: Decimal) -> Self {
        Score {
            hard: hard.normalize(),
            medium: medium.map(|m| m.normalize()),
            soft: soft.normalize(),
        }
    }

    /// Returns the hard score component.
    #[inline]
    pub fn hard(&self) -> Decimal {
        self.hard
    }

    /// Returns the medium score component, if the score has one.
    #[inline]
    pub fn medium(&self) -> Option<Decimal> {
        self.medium
    }

    /// Returns the soft score component.
    #[inline]
    pub fn soft(&self) -> Decimal {
        self.soft
    }

    /// Returns the component for the given level. A missing medium level reads as zero.
    pub fn level(&self, level: ScoreLevel) -> Decimal {
        match level {
            ScoreLevel::Hard => self.hard,
            ScoreLevel::Medium => self.medium.unwrap_or(Decimal::ZERO),
            ScoreLevel::Soft => self.soft,
        }
    }

    /// Returns true if no hard constraint is broken.
    #[inline]
    pub fn is_feasible(&self) -> bool {
        self.hard >= Decimal::ZERO
    }

    /// Returns true if the hard component is negative.
    #[inline]
    pub fn breaks_hard(&self) -> bool {
        self.hard < Decimal::ZERO
    }

    /// Returns true if every component is zero.
    pub fn is_zero(&self) -> bool {
        self.hard.is_zero() && self.soft.is_zero() && self.medium.map_or(true, |m| m.is_zero())
    }

    /// Returns the number of levels this score was reported with.
    pub fn levels_count(&self) -> usize {
        if self.medium.is_some() {
            3
        } else {
            2
        }
    }
}

impl PartialEq for Score {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Score {}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> Ordering {
        self.hard
            .cmp(&other.hard)
            .then_with(|| {
                self.level(ScoreLevel::Medium)
                    .cmp(&other.level(ScoreLevel::Medium))
            })
            .then_with(|| self.soft.cmp(&other.soft))
    }
}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.medium {
            Some(medium) => write!(f, "Score({}, {}, {})", self.hard, medium, self.soft),
            None => write!(f, "Score({}, {})", self.hard, self.soft),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.medium {
            Some(medium) => write!(f, "{}hard/{}medium/{}soft", self.hard, medium, self.soft),
            None => write!(f, "{}hard/{}soft", self.hard, self.soft),
        }
    }
}

// Scores travel as strings on the wire.
impl Serialize for Score {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Score {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
