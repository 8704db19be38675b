use rusqlite::Connection;

use crate::{Error, database_id::PaymentModeId};

/// A means of payment with which a transaction was made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMode {
    /// The id for the payment mode.
    pub id: PaymentModeId,
    /// The display name of the payment mode, e.g. "Cash" or "Credit Card".
    pub mode: String,
}

pub fn create_payment_modes_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS payment_modes (
            id INTEGER PRIMARY KEY,
            mode TEXT NOT NULL UNIQUE
        )",
        (),
    )?;

    Ok(())
}

pub fn map_row_to_payment_mode(row: &rusqlite::Row) -> Result<PaymentMode, rusqlite::Error> {
    let id = row.get(0)?;
    let mode = row.get(1)?;

    Ok(PaymentMode { id, mode })
}

/// Create a payment mode and return it with its generated ID.
///
/// # Errors
/// Returns [Error::DuplicatePaymentMode] if a payment mode with the same name
/// already exists, or [Error::SqlError] for any other SQL error.
pub fn create_payment_mode(mode: &str, connection: &Connection) -> Result<PaymentMode, Error> {
    connection
        .execute("INSERT INTO payment_modes (mode) VALUES (?1)", (mode,))
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicatePaymentMode(mode.to_owned()),
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();

    Ok(PaymentMode {
        id,
        mode: mode.to_owned(),
    })
}

/// Retrieve a single payment mode by ID.
pub fn get_payment_mode(
    payment_mode_id: PaymentModeId,
    connection: &Connection,
) -> Result<PaymentMode, Error> {
    connection
        .prepare("SELECT id, mode FROM payment_modes WHERE id = :id")?
        .query_row(&[(":id", &payment_mode_id)], map_row_to_payment_mode)
        .map_err(|error| error.into())
}

/// Retrieve all payment modes ordered alphabetically.
pub fn get_all_payment_modes(connection: &Connection) -> Result<Vec<PaymentMode>, Error> {
    connection
        .prepare("SELECT id, mode FROM payment_modes ORDER BY mode ASC")?
        .query_map([], map_row_to_payment_mode)?
        .map(|maybe_mode| maybe_mode.map_err(|error| error.into()))
        .collect()
}

/// Get the total number of payment modes in the database.
pub fn count_payment_modes(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM payment_modes;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

#[cfg(test)]
mod create_table_tests {
    use rusqlite::Connection;

    use super::create_payment_modes_table;

    #[test]
    fn sql_is_valid() {
        let connection =
            Connection::open_in_memory().expect("Could not initialise in-memory SQLite database");

        assert_eq!(Ok(()), create_payment_modes_table(&connection));
    }
}
