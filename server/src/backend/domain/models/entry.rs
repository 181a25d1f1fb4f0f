use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::backend::domain::errors::{DomainError, DomainResult};

/// Classification of a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Income,
    Expenditure,
}

impl RecordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Income => "income",
            RecordType::Expenditure => "expenditure",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the two canonical lowercase tokens are accepted.
impl FromStr for RecordType {
    type Err = DomainError;

    fn from_str(token: &str) -> DomainResult<Self> {
        match token {
            "income" => Ok(RecordType::Income),
            "expenditure" => Ok(RecordType::Expenditure),
            other => Err(DomainError::invalid(format!(
                "Invalid record type '{}': expected 'income' or 'expenditure'",
                other
            ))),
        }
    }
}

/// Spending category of an expenditure entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Entertainment,
    Shopping,
    Travel,
    Bills,
    DailyUtilities,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Food,
        Category::Entertainment,
        Category::Shopping,
        Category::Travel,
        Category::Bills,
        Category::DailyUtilities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Food => "food",
            Category::Entertainment => "entertainment",
            Category::Shopping => "shopping",
            Category::Travel => "travel",
            Category::Bills => "bills",
            Category::DailyUtilities => "daily_utilities",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(token: &str) -> DomainResult<Self> {
        Category::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == token)
            .ok_or_else(|| {
                DomainError::invalid(format!(
                    "Invalid category '{}': expected one of food, entertainment, shopping, travel, bills, daily_utilities",
                    token
                ))
            })
    }
}

/// Parse a user supplied amount into a non-negative decimal.
///
/// Accepts plain decimal notation and scientific notation (JSON numbers such
/// as `1e3` arrive in that form).
pub fn parse_amount(raw: Option<&str>, field: &str) -> DomainResult<Decimal> {
    let text = match raw.map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => return Err(DomainError::invalid(format!("{} is required", field))),
    };

    let amount = Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .map_err(|_| DomainError::invalid(format!("{} must be a number, got '{}'", field, text)))?;

    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DomainError::invalid(format!("{} must not be negative", field)));
    }

    Ok(amount)
}

/// A single immutable ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub amount: Decimal,
    pub record_type: RecordType,
    pub category: Option<Category>,
    pub source: Option<String>,
    #[serde(default)]
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

impl Entry {
    /// Build an entry from already typed values.
    ///
    /// Category is required for expenditure and dropped for income; source is
    /// only kept for income.
    pub fn new(
        record_type: RecordType,
        amount: Decimal,
        category: Option<Category>,
        source: Option<String>,
        description: String,
        recorded_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::invalid("amount must not be negative"));
        }

        let (category, source) = match record_type {
            RecordType::Income => (None, source.filter(|s| !s.trim().is_empty())),
            RecordType::Expenditure => match category {
                Some(category) => (Some(category), None),
                None => {
                    return Err(DomainError::invalid(
                        "category is required for expenditure entries",
                    ))
                }
            },
        };

        Ok(Self {
            amount,
            record_type,
            category,
            source,
            description,
            recorded_at,
        })
    }

    /// Build an entry from untyped input, validating every field.
    pub fn parse(
        record_type: Option<&str>,
        amount: Option<&str>,
        category: Option<&str>,
        source: Option<String>,
        description: Option<String>,
        recorded_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let record_type: RecordType = record_type
            .ok_or_else(|| DomainError::invalid("record type is required"))?
            .parse()?;
        let amount = parse_amount(amount, "amount")?;

        let category = match record_type {
            RecordType::Expenditure => match category.map(str::trim).filter(|c| !c.is_empty()) {
                Some(token) => Some(token.parse::<Category>()?),
                None => None,
            },
            RecordType::Income => None,
        };

        Self::new(
            record_type,
            amount,
            category,
            source,
            description.unwrap_or_default(),
            recorded_at,
        )
    }

    /// Amount with the sign it contributes to the balance
    pub fn signed_amount(&self) -> Decimal {
        match self.record_type {
            RecordType::Income => self.amount,
            RecordType::Expenditure => -self.amount,
        }
    }
}
