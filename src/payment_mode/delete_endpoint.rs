//! Defines the endpoint for deleting a payment mode.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, database_id::PaymentModeId};

/// The state needed to delete a payment mode.
#[derive(Debug, Clone)]
pub struct DeletePaymentModeState {
    /// The database connection for managing payment modes.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeletePaymentModeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a payment mode, responds with an alert.
pub async fn delete_payment_mode_endpoint(
    State(state): State<DeletePaymentModeState>,
    Path(payment_mode_id): Path<PaymentModeId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_payment_mode(payment_mode_id, &connection) {
        Ok(rows_affected) if rows_affected != 0 => Alert::SuccessSimple {
            message: "Payment mode deleted successfully".to_owned(),
        }
        .into_response(),
        Ok(_) => Error::DeleteMissingPaymentMode.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete payment mode {payment_mode_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_payment_mode(
    id: PaymentModeId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM payment_modes WHERE id = :id", &[(":id", &id)])
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::PaymentModeInUse,
            error => error.into(),
        })
}
