//! Database query helpers for the transactions page.

use rusqlite::Connection;
use time::Date;

use crate::{Error, database_id::TransactionId, transaction::TransactionType};

/// A transaction row with its category and payment mode names joined on, as
/// shown in the ledger table.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TransactionListRow {
    /// The ID of the transaction.
    pub(crate) id: TransactionId,
    /// When the transaction happened.
    pub(crate) date: Date,
    /// The amount of money spent or earned in this transaction.
    pub(crate) amount: f64,
    /// Whether money was earned or spent.
    pub(crate) transaction_type: TransactionType,
    /// The name of the transaction's category.
    pub(crate) category_name: String,
    /// The name of the transaction's payment mode.
    pub(crate) payment_mode: String,
    /// A text description of what the transaction was for.
    pub(crate) description: Option<String>,
}

/// Get the most recently dated transactions with their lookup names joined on.
///
/// Rows are ordered by transaction date, newest first, then by creation time
/// and ID to keep the order stable for rows sharing a date. At most `limit`
/// rows are returned; there is no pagination beyond this window.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Transaction row mapping fails
pub(crate) fn get_recent_transactions(
    limit: u32,
    connection: &Connection,
) -> Result<Vec<TransactionListRow>, Error> {
    connection
        .prepare(
            "SELECT transactions.id, date, amount, type, categories.name, payment_modes.mode, description
             FROM transactions
             INNER JOIN categories ON transactions.category_id = categories.id
             INNER JOIN payment_modes ON transactions.payment_mode_id = payment_modes.id
             ORDER BY date DESC, created_on DESC, transactions.id DESC
             LIMIT :limit",
        )?
        .query_map(&[(":limit", &limit)], |row| {
            Ok(TransactionListRow {
                id: row.get(0)?,
                date: row.get(1)?,
                amount: row.get(2)?,
                transaction_type: row.get(3)?,
                category_name: row.get(4)?,
                payment_mode: row.get(5)?,
                description: row.get(6)?,
            })
        })?
        .map(|row_result| row_result.map_err(Error::SqlError))
        .collect()
}

/// Keep the rows whose description or category name contains `search`,
/// ignoring case.
///
/// The filter applies within the rows already fetched for the page, so a
/// search never reaches further back in time than the page itself does. A
/// blank search keeps every row.
pub(crate) fn filter_transactions(
    rows: Vec<TransactionListRow>,
    search: &str,
) -> Vec<TransactionListRow> {
    let needle = search.trim().to_lowercase();

    if needle.is_empty() {
        return rows;
    }

    rows.into_iter()
        .filter(|row| {
            row.description
                .as_deref()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle)
                || row.category_name.to_lowercase().contains(&needle)
        })
        .collect()
}
