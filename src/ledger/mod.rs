//! Income and expenses: transaction records, the pages for keeping them and
//! the aggregations that reports are built from.

mod aggregation;
mod core;
mod create;
mod db;
mod delete;
mod edit;
mod form;
mod list;
mod period;

pub use aggregation::{
    CategoryShare, PeriodDelta, PeriodTotals, breakdown_by_category, monthly_totals, pct_change,
    period_over_period_delta, round_percent, running_balance, total_by_direction, totals,
    totals_for_period,
};
pub use core::{
    Direction, EXPENSE_CATEGORIES, INCOME_CATEGORIES, MAX_AMOUNT, Money, NewTransaction,
    Transaction, TransactionId, check_amount, parse_rupiah,
};
pub use create::{create_transaction_endpoint, get_new_transaction_page};
pub use db::{
    TransactionQuery, create_transaction, create_transaction_table, delete_transaction,
    get_transaction, get_transactions, update_transaction,
};
pub use delete::delete_transaction_endpoint;
pub use edit::{get_edit_transaction_page, update_transaction_endpoint};
pub use list::get_transactions_page;
pub use period::Period;

#[cfg(test)]
pub(crate) use db::new_transaction_fixture;
