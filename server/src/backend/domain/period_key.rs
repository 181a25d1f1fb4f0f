//! Period keys group ledger entries by calendar month, year and record type.
//!
//! The same derivation is used when an entry is written (month and year of
//! the recording instant, UTC) and when a caller reads a bucket back by
//! `MM-YYYY`, so both paths always agree on the key.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::backend::domain::errors::{DomainError, DomainResult};
use crate::backend::domain::models::entry::RecordType;

/// Bucket identifier such as `04-2025_income`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodKey(String);

impl PeriodKey {
    /// Derive the key for a record type in a given month (1-12) and year.
    pub fn derive(record_type: RecordType, month: u32, year: i32) -> DomainResult<Self> {
        let period = MonthYear::new(month, year)?;
        Ok(Self::for_period(record_type, period))
    }

    pub fn for_period(record_type: RecordType, period: MonthYear) -> Self {
        PeriodKey(format!("{}_{}", period, record_type.as_str()))
    }

    /// Key of the bucket an entry recorded at `at` belongs to
    pub fn for_timestamp(record_type: RecordType, at: DateTime<Utc>) -> Self {
        Self::for_period(record_type, MonthYear::of(at))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A calendar month of a given year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthYear {
    month: u32,
    year: i32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> DomainResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::invalid(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
        if !(0..=9999).contains(&year) {
            return Err(DomainError::invalid(format!(
                "year must have at most four digits, got {}",
                year
            )));
        }
        Ok(Self { month, year })
    }

    pub fn of(at: DateTime<Utc>) -> Self {
        Self {
            month: at.month(),
            year: at.year(),
        }
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }
}

impl fmt::Display for MonthYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{}", self.month, self.year)
    }
}

/// Parses `MM-YYYY`; a single digit month (`4-2025`) is accepted as well.
impl FromStr for MonthYear {
    type Err = DomainError;

    fn from_str(text: &str) -> DomainResult<Self> {
        let invalid = || {
            DomainError::invalid(format!(
                "monthYear must look like MM-YYYY, got '{}'",
                text
            ))
        };

        let (month, year) = text.trim().split_once('-').ok_or_else(invalid)?;
        if month.is_empty() || month.len() > 2 || year.len() != 4 {
            return Err(invalid());
        }
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;

        MonthYear::new(month, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn derive_zero_pads_the_month() {
        let key = PeriodKey::derive(RecordType::Income, 4, 2025).unwrap();
        assert_eq!(key.as_str(), "04-2025_income");

        let key = PeriodKey::derive(RecordType::Expenditure, 11, 2024).unwrap();
        assert_eq!(key.as_str(), "11-2024_expenditure");
    }

    #[test]
    fn income_and_expenditure_of_a_month_use_distinct_keys() {
        let income = PeriodKey::derive(RecordType::Income, 4, 2025).unwrap();
        let spend = PeriodKey::derive(RecordType::Expenditure, 4, 2025).unwrap();
        assert_ne!(income, spend);
    }

    #[test]
    fn derive_rejects_out_of_range_month() {
        assert!(PeriodKey::derive(RecordType::Income, 0, 2025).is_err());
        assert!(PeriodKey::derive(RecordType::Income, 13, 2025).is_err());
    }

    #[test]
    fn write_and_read_paths_agree() {
        let at = Utc.with_ymd_and_hms(2025, 4, 30, 23, 59, 59).unwrap();
        let written = PeriodKey::for_timestamp(RecordType::Expenditure, at);
        let read = PeriodKey::for_period(RecordType::Expenditure, "04-2025".parse().unwrap());
        assert_eq!(written, read);
    }

    #[test]
    fn month_year_parsing() {
        let period: MonthYear = "4-2025".parse().unwrap();
        assert_eq!((period.month(), period.year()), (4, 2025));
        assert_eq!(period.to_string(), "04-2025");

        for bad in ["", "2025-04", "04/2025", "13-2025", "ab-2025", "04-25", "004-2025"] {
            assert!(bad.parse::<MonthYear>().is_err(), "accepted {:?}", bad);
        }
    }
}
