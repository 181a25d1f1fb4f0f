use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::backend::domain::errors::{DomainError, DomainResult};

/// How hard a goal is to reach.
///
/// The ordering is the ranking priority: `Hard < Medium < Easy`, so harder
/// goals sort first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// Position in the ranking, lower ranks first
    pub fn priority_rank(&self) -> u8 {
        match self {
            Difficulty::Hard => 0,
            Difficulty::Medium => 1,
            Difficulty::Easy => 2,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Interpret a stored value. Missing or unrecognised values fall back to
    /// `Medium`; the second element reports whether the fallback was used.
    pub fn from_stored(value: Option<&str>) -> (Self, bool) {
        match value.map(str::parse::<Difficulty>) {
            Some(Ok(difficulty)) => (difficulty, false),
            _ => (Difficulty::Medium, true),
        }
    }
}

impl Ord for Difficulty {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority_rank().cmp(&other.priority_rank())
    }
}

impl PartialOrd for Difficulty {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(token: &str) -> DomainResult<Self> {
        match token {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::invalid(format!(
                "Invalid difficulty '{}': expected 'easy', 'medium' or 'hard'",
                other
            ))),
        }
    }
}

/// A savings goal owned by one account
#[derive(Debug, Clone, PartialEq)]
pub struct Goal {
    pub id: String,
    pub goal_name: String,
    pub description: String,
    pub target_amount: Decimal,
    pub current_saving: Decimal,
    pub completed: bool,
    pub difficulty: Difficulty,
    pub created_date: DateTime<Utc>,
    pub deadline_date: Option<DateTime<Utc>>,
}

/// Parse a deadline given either as RFC 3339 or as a plain `YYYY-MM-DD` date
/// (interpreted as midnight UTC).
pub fn parse_deadline(text: &str) -> DomainResult<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| {
            DomainError::invalid(format!(
                "deadlineDate must be an RFC 3339 timestamp or YYYY-MM-DD, got '{}'",
                text
            ))
        })
}
