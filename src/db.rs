//! Database initialization for the application's SQLite schema.

use rusqlite::Connection;

use crate::{
    category::create_categories_table, payment_mode::create_payment_modes_table,
    transaction::create_transactions_table,
};

/// Create the application tables if they do not already exist.
///
/// Foreign key enforcement is off by default in SQLite, so it is switched on
/// here for the lifetime of the connection.
///
/// # Errors
/// Returns an error if a table cannot be created or if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.pragma_update(None, "foreign_keys", true)?;

    create_categories_table(connection)?;
    create_payment_modes_table(connection)?;
    create_transactions_table(connection)?;

    Ok(())
}
