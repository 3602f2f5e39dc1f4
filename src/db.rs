/*! This module sets up the application's database schema. */

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, booking::create_booking_table, ledger::create_transaction_table,
    report::create_opening_balance_table, room::create_room_table,
};

/// Create all the tables and indexes the app needs, if they do not exist yet.
///
/// Foreign key enforcement is switched on for `connection`, so that bookings
/// cannot refer to rooms that do not exist.
///
/// # Errors
/// Returns an error if there is an SQL error. No table is created unless all
/// of them are.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_room_table(&transaction)?;
    create_booking_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_opening_balance_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
