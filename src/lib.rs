//! Varamio is a self-hosted web app for tracking income and expenses.
//!
//! It serves a small admin dashboard: summary cards, a transaction ledger
//! with search and delete, and master-data screens for the category and
//! payment mode lookup tables. All pages are rendered server-side as HTML.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use time::Date;
use tokio::signal;

mod alert;
mod app_state;
mod category;
mod dashboard;
mod database_id;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod navigation;
mod not_found;
mod payment_mode;
mod report;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::{AppState, DEFAULT_TRANSACTION_LIMIT};
pub use db::initialize as initialize_db;
pub use routing::build_router;

use crate::{
    alert::{Alert, render_alert},
    database_id::{CategoryId, PaymentModeId},
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A date in the future was used to create a transaction.
    ///
    /// Transactions record events that have already happened, therefore future
    /// dates are not allowed.
    #[error("{0} is a date in the future, which is not allowed")]
    FutureDate(Date),

    /// A zero or negative amount was used to create a transaction.
    ///
    /// The sign of a transaction is carried by its type (income or expense),
    /// so the amount itself must be strictly positive.
    #[error("the amount must be greater than zero, got {0}")]
    NonPositiveAmount(f64),

    /// The category ID used to create a transaction did not match an existing category.
    #[error("the category ID {0} does not refer to an existing category")]
    InvalidCategory(CategoryId),

    /// The payment mode ID used to create a transaction did not match an existing payment mode.
    #[error("the payment mode ID {0} does not refer to an existing payment mode")]
    InvalidPaymentMode(PaymentModeId),

    /// A foreign key constraint failed while writing a transaction.
    ///
    /// Callers that know which lookup table was at fault should prefer
    /// [Error::InvalidCategory] or [Error::InvalidPaymentMode].
    #[error("the category or payment mode ID does not refer to an existing row")]
    InvalidReference,

    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// The specified category name already exists in the database.
    #[error("the category \"{0}\" already exists in the database")]
    DuplicateCategoryName(String),

    /// The specified payment mode already exists in the database.
    #[error("the payment mode \"{0}\" already exists in the database")]
    DuplicatePaymentMode(String),

    /// Tried to delete a transaction that does not exist.
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// Tried to update a category that does not exist.
    #[error("tried to update a category that is not in the database")]
    UpdateMissingCategory,

    /// Tried to delete a category that does not exist.
    #[error("tried to delete a category that is not in the database")]
    DeleteMissingCategory,

    /// Tried to update a payment mode that does not exist.
    #[error("tried to update a payment mode that is not in the database")]
    UpdateMissingPaymentMode,

    /// Tried to delete a payment mode that does not exist.
    #[error("tried to delete a payment mode that is not in the database")]
    DeleteMissingPaymentMode,

    /// Tried to delete a category that transactions still reference.
    #[error("the category is still used by one or more transactions")]
    CategoryInUse,

    /// Tried to delete a payment mode that transactions still reference.
    #[error("the payment mode is still used by one or more transactions")]
    PaymentModeInUse,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    fn into_alert_response(self) -> Response {
        match self {
            Error::InvalidTimezoneError(timezone) => render_alert(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Invalid Timezone Settings",
                    &format!(
                        "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                    ),
                ),
            ),
            Error::FutureDate(date) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid transaction date",
                    &format!(
                        "{date} is a date in the future, which is not allowed. Change the date to \
                        today or earlier."
                    ),
                ),
            ),
            Error::NonPositiveAmount(amount) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid amount",
                    &format!("The amount must be greater than zero, got {amount}."),
                ),
            ),
            Error::InvalidCategory(category_id) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid category",
                    &format!("Could not find a category with the ID {category_id}."),
                ),
            ),
            Error::InvalidPaymentMode(payment_mode_id) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid payment mode",
                    &format!("Could not find a payment mode with the ID {payment_mode_id}."),
                ),
            ),
            Error::InvalidReference => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Invalid category or payment mode",
                    "Select a category and payment mode from the lists and try again.",
                ),
            ),
            Error::DeleteMissingTransaction => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete transaction",
                    "The transaction could not be found. \
                    Try refreshing the page to see if the transaction has already been deleted.",
                ),
            ),
            Error::UpdateMissingCategory => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update category",
                    "The category could not be found.",
                ),
            ),
            Error::DeleteMissingCategory => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete category",
                    "The category could not be found. \
                    Try refreshing the page to see if the category has already been deleted.",
                ),
            ),
            Error::UpdateMissingPaymentMode => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not update payment mode",
                    "The payment mode could not be found.",
                ),
            ),
            Error::DeleteMissingPaymentMode => render_alert(
                StatusCode::NOT_FOUND,
                Alert::error(
                    "Could not delete payment mode",
                    "The payment mode could not be found. \
                    Try refreshing the page to see if the payment mode has already been deleted.",
                ),
            ),
            Error::CategoryInUse => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Could not delete category",
                    "One or more transactions still use this category. \
                    Delete or recategorize those transactions first.",
                ),
            ),
            Error::PaymentModeInUse => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Could not delete payment mode",
                    "One or more transactions still use this payment mode. \
                    Delete those transactions or move them to another payment mode first.",
                ),
            ),
            Error::DuplicateCategoryName(name) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Duplicate Category Name",
                    &format!(
                        "The category {name} already exists in the database. \
                        Choose a different name, or edit or delete the existing category.",
                    ),
                ),
            ),
            Error::DuplicatePaymentMode(mode) => render_alert(
                StatusCode::BAD_REQUEST,
                Alert::error(
                    "Duplicate Payment Mode",
                    &format!(
                        "The payment mode {mode} already exists in the database. \
                        Choose a different name, or edit or delete the existing payment mode.",
                    ),
                ),
            ),
            _ => render_alert(
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                ),
            ),
        }
    }
}
