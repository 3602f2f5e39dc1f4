//! Financial aggregation over transactions.
//!
//! Everything here is a pure function of its inputs. Amounts are summed as
//! whole Rupiah so that totals are exact; percentages are kept as unrounded
//! floating point numbers and are only rounded for display with
//! [round_percent].
//!
//! Sums saturate at the bounds of [Money] instead of overflowing. Amounts
//! entered through the app are capped at [MAX_AMOUNT](crate::ledger::MAX_AMOUNT),
//! so totals only saturate for records that bypassed validation.

use std::collections::HashMap;

use serde::Serialize;

use crate::ledger::{Direction, Money, Period, Transaction};

/// Income, expense and their difference for a set of transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PeriodTotals {
    pub income: Money,
    pub expense: Money,
    /// `income - expense`, negative when more money went out than came in.
    pub net: Money,
}

impl PeriodTotals {
    fn new(income: Money, expense: Money) -> Self {
        Self {
            income,
            expense,
            net: income.saturating_sub(expense),
        }
    }
}

/// The amount recorded under one category and its share of the total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: Money,
    /// The share of the direction's total as a percentage from 0 to 100.
    ///
    /// `None` when the total is zero.
    pub percent_of_total: Option<f64>,
}

/// The change in income and expense from one period to the next.
///
/// A change is `None` when the previous value is zero, since a percentage of
/// zero is not meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PeriodDelta {
    pub income_pct_change: Option<f64>,
    pub expense_pct_change: Option<f64>,
}

/// The sum of the amounts of all transactions with the given direction.
pub fn total_by_direction(transactions: &[Transaction], direction: Direction) -> Money {
    transactions
        .iter()
        .filter(|transaction| transaction.direction == direction)
        .fold(0, |total: Money, transaction| {
            total.saturating_add(transaction.amount)
        })
}

/// Income, expense and net over all of `transactions`.
pub fn totals(transactions: &[Transaction]) -> PeriodTotals {
    PeriodTotals::new(
        total_by_direction(transactions, Direction::Income),
        total_by_direction(transactions, Direction::Expense),
    )
}

/// Income, expense and net over the transactions dated inside `period`.
pub fn totals_for_period(transactions: &[Transaction], period: Period) -> PeriodTotals {
    let (income, expense) = transactions
        .iter()
        .filter(|transaction| period.contains(transaction.date))
        .fold((0 as Money, 0 as Money), |(income, expense), transaction| {
            match transaction.direction {
                Direction::Income => (income.saturating_add(transaction.amount), expense),
                Direction::Expense => (income, expense.saturating_add(transaction.amount)),
            }
        });

    PeriodTotals::new(income, expense)
}

/// The totals of each month of `year`, January first.
pub fn monthly_totals(transactions: &[Transaction], year: i32) -> Vec<(Period, PeriodTotals)> {
    Period::months_of(year)
        .map(|month| (month, totals_for_period(transactions, month)))
        .collect()
}

/// Group the transactions with the given direction by category.
///
/// Categories are compared exactly, so "Zakat" and "zakat" are separate
/// groups. Groups are returned in the order in which their category first
/// appears in `transactions`.
pub fn breakdown_by_category(
    transactions: &[Transaction],
    direction: Direction,
) -> Vec<CategoryShare> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Money)> = Vec::new();

    for transaction in transactions
        .iter()
        .filter(|transaction| transaction.direction == direction)
    {
        match positions.get(transaction.category.as_str()) {
            Some(&position) => {
                groups[position].1 = groups[position].1.saturating_add(transaction.amount)
            }
            None => {
                positions.insert(transaction.category.as_str(), groups.len());
                groups.push((transaction.category.as_str(), transaction.amount));
            }
        }
    }

    let total = groups
        .iter()
        .fold(0 as Money, |total, (_, amount)| total.saturating_add(*amount));

    groups
        .into_iter()
        .map(|(category, amount)| CategoryShare {
            category: category.to_owned(),
            amount,
            percent_of_total: percentage_of(amount, total),
        })
        .collect()
}

/// The change from `previous` to `current` as a percentage of `previous`.
///
/// Returns `None` if `previous` is zero.
pub fn pct_change(current: Money, previous: Money) -> Option<f64> {
    if previous == 0 {
        None
    } else {
        Some((current as f64 - previous as f64) / previous as f64 * 100.0)
    }
}

/// Compare the income and expense of two periods.
pub fn period_over_period_delta(current: &PeriodTotals, previous: &PeriodTotals) -> PeriodDelta {
    PeriodDelta {
        income_pct_change: pct_change(current.income, previous.income),
        expense_pct_change: pct_change(current.expense, previous.expense),
    }
}

/// The balance at the end of a period that started with `opening` and had a
/// net result of `period_net`.
pub fn running_balance(opening: Money, period_net: Money) -> Money {
    opening.saturating_add(period_net)
}

/// Round a percentage to `decimals` decimal places for display.
pub fn round_percent(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);

    (value * scale).round() / scale
}

fn percentage_of(amount: Money, total: Money) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(amount as f64 / total as f64 * 100.0)
    }
}
