//! The ledger domain model: money, directions and transaction records.

use std::{fmt::Display, str::FromStr};

use rusqlite::{
    ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{database_id::DatabaseId, validation::ValidationError};

/// An amount of money in whole Rupiah.
pub type Money = i64;

/// The largest amount a single transaction, rental rate or opening balance
/// may have: one quadrillion Rupiah.
pub const MAX_AMOUNT: Money = 1_000_000_000_000_000;

pub type TransactionId = DatabaseId;

/// The categories offered for income in the transaction form.
pub const INCOME_CATEGORIES: [&str; 6] = [
    "Infaq Jumat",
    "Infaq Harian",
    "Zakat",
    "Donasi",
    "Sewa",
    "Lainnya",
];

/// The categories offered for expenses in the transaction form.
pub const EXPENSE_CATEGORIES: [&str; 7] = [
    "Utilitas",
    "Perlengkapan",
    "Perawatan",
    "Gaji",
    "Kegiatan",
    "Sosial",
    "Lainnya",
];

/// Whether money came in or went out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Income,
    Expense,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Income => "income",
            Direction::Expense => "expense",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Direction::Income => "Income",
            Direction::Expense => "Expense",
        }
    }

    /// The suggested categories for this direction.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Direction::Income => &INCOME_CATEGORIES,
            Direction::Expense => &EXPENSE_CATEGORIES,
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Direction::Income),
            "expense" => Ok(Direction::Expense),
            other => Err(ValidationError::InvalidDirection(other.to_owned())),
        }
    }
}

impl ToSql for Direction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Direction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// Money received or spent by the mosque.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: TransactionId,
    pub date: Date,
    /// A free text label, e.g. "Infaq Jumat". Labels are grouped exactly as
    /// written.
    pub category: String,
    pub description: String,
    /// Always zero or more, [Transaction::direction] carries the sign.
    pub amount: Money,
    pub direction: Direction,
    /// Who handled the money, e.g. "Bendahara".
    pub responsible_party: String,
    /// A description of the receipt or other proof.
    pub evidence: String,
}

/// The fields needed to record a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: Date,
    pub category: String,
    pub description: String,
    pub amount: Money,
    pub direction: Direction,
    pub responsible_party: String,
    pub evidence: String,
}

impl NewTransaction {
    /// # Errors
    /// Returns a [ValidationError] if the amount is negative or above
    /// [MAX_AMOUNT], or the category is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount(self.amount)?;

        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category"));
        }

        Ok(())
    }
}

/// Parse a whole number of Rupiah as typed by a person.
///
/// An optional "Rp" prefix, spaces and the thousands separators "." and ","
/// are ignored, so "Rp 3.200.000" and "3,200,000" both parse as 3200000.
///
/// # Errors
/// Returns [ValidationError::InvalidAmount] if what remains is not an integer,
/// [ValidationError::NegativeAmount] if it is below zero and
/// [ValidationError::AmountTooLarge] if it is above [MAX_AMOUNT].
pub fn parse_rupiah(text: &str) -> Result<Money, ValidationError> {
    let trimmed = text.trim();
    let without_prefix = trimmed
        .strip_prefix("Rp")
        .or_else(|| trimmed.strip_prefix("rp"))
        .unwrap_or(trimmed);
    let digits: String = without_prefix
        .chars()
        .filter(|c| !matches!(c, '.' | ',' | ' '))
        .collect();

    let amount: Money = digits
        .parse()
        .map_err(|_| ValidationError::InvalidAmount(text.to_owned()))?;

    check_amount(amount)?;

    Ok(amount)
}

/// Check that `amount` is from zero to [MAX_AMOUNT].
///
/// # Errors
/// Returns [ValidationError::NegativeAmount] or
/// [ValidationError::AmountTooLarge] when it is not.
pub fn check_amount(amount: Money) -> Result<(), ValidationError> {
    if amount < 0 {
        return Err(ValidationError::NegativeAmount(amount));
    }

    if amount > MAX_AMOUNT {
        return Err(ValidationError::AmountTooLarge(amount));
    }

    Ok(())
}


#[cfg(test)]
mod new_transaction_tests {
    use time::macros::date;

    use crate::validation::ValidationError;

    use super::{Direction, MAX_AMOUNT, NewTransaction};

    fn new_transaction(amount: i64, category: &str) -> NewTransaction {
        NewTransaction {
            date: date!(2026 - 02 - 07),
            category: category.to_owned(),
            description: "Infaq sholat Jumat".to_owned(),
            amount,
            direction: Direction::Income,
            responsible_party: "Bendahara".to_owned(),
            evidence: String::new(),
        }
    }

    #[test]
    fn accepts_zero_amount() {
        assert_eq!(new_transaction(0, "Infaq Jumat").validate(), Ok(()));
    }

    #[test]
    fn rejects_negative_amount() {
        assert_eq!(
            new_transaction(-1, "Infaq Jumat").validate(),
            Err(ValidationError::NegativeAmount(-1))
        );
    }

    #[test]
    fn rejects_amount_above_limit() {
        assert_eq!(new_transaction(MAX_AMOUNT, "Donasi").validate(), Ok(()));
        assert_eq!(
            new_transaction(MAX_AMOUNT + 1, "Donasi").validate(),
            Err(ValidationError::AmountTooLarge(MAX_AMOUNT + 1))
        );
    }

    #[test]
    fn rejects_blank_category() {
        assert_eq!(
            new_transaction(1000, "  ").validate(),
            Err(ValidationError::MissingField("category"))
        );
    }
}
