//! Database operations for transactions.

use std::ops::RangeInclusive;

use rusqlite::{Connection, Row, ToSql};
use time::Date;

use crate::{
    Error,
    ledger::{Direction, NewTransaction, Transaction, TransactionId},
};

/// Defines which transactions [get_transactions] returns.
///
/// Every filter that is set must match. The default query returns all
/// transactions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransactionQuery {
    /// Only include income or only include expenses.
    pub direction: Option<Direction>,
    /// Only include transactions whose description or category contains this
    /// text, ignoring ASCII case.
    pub search: Option<String>,
    /// Only include transactions dated within this range (inclusive).
    pub date_range: Option<RangeInclusive<Date>>,
}

/// Record a transaction and return it with its generated ID.
pub fn create_transaction(
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\"
            (date, category, description, amount, direction, responsible_party, evidence)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            RETURNING id, date, category, description, amount, direction,
                responsible_party, evidence;",
        )?
        .query_row(
            (
                transaction.date,
                &transaction.category,
                &transaction.description,
                transaction.amount,
                transaction.direction,
                &transaction.responsible_party,
                &transaction.evidence,
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single transaction by ID.
pub fn get_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, date, category, description, amount, direction,
                responsible_party, evidence
            FROM \"transaction\" WHERE id = :id;",
        )?
        .query_row(&[(":id", &transaction_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve the transactions matching `query`, newest first.
///
/// Transactions on the same day are ordered by when they were recorded, the
/// most recent first.
pub fn get_transactions(
    query: &TransactionQuery,
    connection: &Connection,
) -> Result<Vec<Transaction>, Error> {
    let search_pattern = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|search| !search.is_empty())
        .map(|search| format!("%{search}%"));

    let mut where_clauses = Vec::new();
    let mut params: Vec<(&str, &dyn ToSql)> = Vec::new();

    if let Some(ref direction) = query.direction {
        where_clauses.push("direction = :direction");
        params.push((":direction", direction));
    }

    if let Some(ref pattern) = search_pattern {
        where_clauses.push("(description LIKE :search OR category LIKE :search)");
        params.push((":search", pattern));
    }

    if let Some(ref date_range) = query.date_range {
        where_clauses.push("date BETWEEN :start_date AND :end_date");
        params.push((":start_date", date_range.start()));
        params.push((":end_date", date_range.end()));
    }

    let where_clause = if where_clauses.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", where_clauses.join(" AND "))
    };

    let sql = format!(
        "SELECT id, date, category, description, amount, direction,
            responsible_party, evidence
        FROM \"transaction\" {where_clause}
        ORDER BY date DESC, id DESC;"
    );

    connection
        .prepare(&sql)?
        .query_map(params.as_slice(), map_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(|error| error.into()))
        .collect()
}

/// Replace the fields of a transaction. Returns an error if the transaction
/// doesn't exist.
pub fn update_transaction(
    transaction_id: TransactionId,
    transaction: NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
        SET date = ?1, category = ?2, description = ?3, amount = ?4, direction = ?5,
            responsible_party = ?6, evidence = ?7
        WHERE id = ?8",
        (
            transaction.date,
            &transaction.category,
            &transaction.description,
            transaction.amount,
            transaction.direction,
            &transaction.responsible_party,
            &transaction.evidence,
            transaction_id,
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete a transaction by ID. Returns an error if the transaction doesn't
/// exist.
pub fn delete_transaction(
    transaction_id: TransactionId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected =
        connection.execute("DELETE FROM \"transaction\" WHERE id = ?1", [transaction_id])?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Initialize the transaction table and indexes.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY,
            date TEXT NOT NULL,
            category TEXT NOT NULL,
            description TEXT NOT NULL,
            amount INTEGER NOT NULL CHECK (amount >= 0),
            direction TEXT NOT NULL CHECK (direction IN ('income', 'expense')),
            responsible_party TEXT NOT NULL,
            evidence TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_date ON \"transaction\"(date);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        date: row.get(1)?,
        category: row.get(2)?,
        description: row.get(3)?,
        amount: row.get(4)?,
        direction: row.get(5)?,
        responsible_party: row.get(6)?,
        evidence: row.get(7)?,
    })
}

#[cfg(test)]
pub(crate) fn new_transaction_fixture(
    date: Date,
    category: &str,
    amount: i64,
    direction: Direction,
) -> NewTransaction {
    NewTransaction {
        date,
        category: category.to_owned(),
        description: format!("{category} {date}"),
        amount,
        direction,
        responsible_party: "Bendahara".to_owned(),
        evidence: String::new(),
    }
}
