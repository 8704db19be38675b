//! Transaction management for the finance dashboard.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing, querying, and deleting transactions
//! - View handlers for the ledger and the new transaction page

mod core;
mod create_endpoint;
mod create_page;
mod delete_endpoint;
mod form;
mod query;
mod transactions_page;

pub use core::{
    Transaction, TransactionBuilder, TransactionType, count_transactions, create_transaction,
    create_transactions_table, map_transaction_row,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use delete_endpoint::delete_transaction_endpoint;
pub use transactions_page::get_transactions_page;

#[cfg(test)]
pub use core::get_transaction;
