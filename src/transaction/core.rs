//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{
    Connection, Row,
    types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::{CategoryId, PaymentModeId, TransactionId},
};

// ============================================================================
// MODELS
// ============================================================================

/// Whether a transaction brought money in or took money out.
///
/// The amount of a transaction is always positive; this type carries the sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. salary or interest.
    Income,
    /// Money spent.
    Expense,
}

impl TransactionType {
    /// The string stored in the database for this transaction type.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            other => Err(FromSqlError::Other(
                format!("unknown transaction type {other:?}").into(),
            )),
        }
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// When the transaction happened.
    pub date: Date,
    /// The amount of money spent or earned in this transaction.
    ///
    /// Always positive, the sign is carried by `transaction_type`.
    pub amount: f64,
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,
    /// The ID of the category the transaction belongs to.
    pub category_id: CategoryId,
    /// The ID of the payment mode the transaction was made with.
    pub payment_mode_id: PaymentModeId,
    /// An optional text description of what the transaction was for.
    pub description: Option<String>,
    /// When the transaction was recorded.
    ///
    /// Used as a tie-break when ordering transactions that share a date.
    pub created_on: OffsetDateTime,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        amount: f64,
        date: Date,
        transaction_type: TransactionType,
        category_id: CategoryId,
        payment_mode_id: PaymentModeId,
    ) -> TransactionBuilder {
        TransactionBuilder {
            amount,
            date,
            transaction_type,
            category_id,
            payment_mode_id,
            description: None,
        }
    }
}

/// A builder for creating [Transaction] instances.
///
/// All required fields are set up front via [Transaction::build]; the optional
/// description can be chained on before handing the builder to
/// [create_transaction].
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The monetary amount of the transaction. Must be positive.
    pub amount: f64,
    /// The date when the transaction occurred. Must not be in the future.
    pub date: Date,
    /// Whether money was earned or spent.
    pub transaction_type: TransactionType,
    /// The category of the transaction, e.g. "Groceries", "Transport", "Rent".
    pub category_id: CategoryId,
    /// The means of payment, e.g. "Cash", "Card".
    pub payment_mode_id: PaymentModeId,
    /// An optional human-readable description of the transaction.
    pub description: Option<String>,
}

impl TransactionBuilder {
    /// Set the description for the transaction.
    ///
    /// Blank descriptions are stored as no description.
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create a new transaction in the database from a builder.
///
/// The creation timestamp is set to the current UTC time.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidReference] if the category or payment mode ID does not
///   refer to an existing row,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let created_on = OffsetDateTime::now_utc();

    let transaction = connection
        .prepare(
            "INSERT INTO transactions (date, amount, type, category_id, payment_mode_id, description, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING id, date, amount, type, category_id, payment_mode_id, description, created_on",
        )?
        .query_row(
            (
                builder.date,
                builder.amount,
                builder.transaction_type,
                builder.category_id,
                builder.payment_mode_id,
                builder.description,
                created_on,
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidReference,
            error => error.into(),
        })?;

    Ok(transaction)
}

/// Retrieve a transaction from the database by its `id`.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `id` does not refer to a valid transaction,
/// - or [Error::SqlError] there is some other SQL error.
pub fn get_transaction(id: TransactionId, connection: &Connection) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(
            "SELECT id, date, amount, type, category_id, payment_mode_id, description, created_on
             FROM transactions WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_transaction_row)?;

    Ok(transaction)
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(id) FROM transactions;", [], |row| row.get(0))
        .map_err(|error| error.into())
}

/// Create the transactions table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transactions_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT NOT NULL,
                amount REAL NOT NULL,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                category_id INTEGER NOT NULL,
                payment_mode_id INTEGER NOT NULL,
                description TEXT,
                created_on TEXT NOT NULL,
                FOREIGN KEY(category_id) REFERENCES categories(id),
                FOREIGN KEY(payment_mode_id) REFERENCES payment_modes(id)
                )",
        (),
    )?;

    // Ensure the sequence starts at 1
    connection.execute(
        "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('transactions', 0)",
        (),
    )?;

    // Composite index matching the ledger's sort order.
    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transactions_date_created_on
         ON transactions(date DESC, created_on DESC);",
        (),
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let id = row.get(0)?;
    let date = row.get(1)?;
    let amount = row.get(2)?;
    let transaction_type = row.get(3)?;
    let category_id = row.get(4)?;
    let payment_mode_id = row.get(5)?;
    let description = row.get(6)?;
    let created_on = row.get(7)?;

    Ok(Transaction {
        id,
        date,
        amount,
        transaction_type,
        category_id,
        payment_mode_id,
        description,
        created_on,
    })
}

// ============================================================================
// TESTS
// ============================================================================
