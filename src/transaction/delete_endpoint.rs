//! Defines the endpoint for deleting a transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use rusqlite::Connection;

use crate::{AppState, Error, alert::Alert, database_id::TransactionId};

/// The state needed to delete a transaction.
#[derive(Debug, Clone)]
pub struct DeleteTransactionState {
    /// The database connection for managing transactions.
    db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DeleteTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A route handler for deleting a transaction, responds with an alert.
///
/// The delete button in the ledger swaps its table row out on success, so the
/// status code has to be 200 OK or HTMX will not delete the row.
pub async fn delete_transaction_endpoint(
    State(state): State<DeleteTransactionState>,
    Path(transaction_id): Path<TransactionId>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match delete_transaction(transaction_id, &connection) {
        Ok(rows_affected) if rows_affected != 0 => Alert::SuccessSimple {
            message: "Transaction deleted".to_owned(),
        }
        .into_response(),
        Ok(_) => Error::DeleteMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not delete transaction {transaction_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn delete_transaction(
    id: TransactionId,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute("DELETE FROM transactions WHERE id = :id", &[(":id", &id)])
        .map_err(|err| err.into())
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error,
        category::{CategoryName, create_category},
        db::initialize,
        payment_mode::create_payment_mode,
        transaction::{
            Transaction, TransactionType, create_transaction,
            delete_endpoint::delete_transaction, delete_transaction_endpoint, get_transaction,
        },
    };

    use super::DeleteTransactionState;

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn create_test_transaction(connection: &Connection) -> Transaction {
        let category = create_category(CategoryName::new_unchecked("Groceries"), connection)
            .expect("Could not create test category");
        let payment_mode =
            create_payment_mode("Card", connection).expect("Could not create test payment mode");

        create_transaction(
            Transaction::build(
                1.23,
                date!(2026 - 01 - 05),
                TransactionType::Expense,
                category.id,
                payment_mode.id,
            )
            .description(Some("Test".to_owned())),
            connection,
        )
        .expect("Could not create test transaction")
    }

    #[test]
    fn deletes_transaction() {
        let connection = get_test_connection();
        let transaction = create_test_transaction(&connection);

        let rows_affected = delete_transaction(transaction.id, &connection).unwrap();

        assert_eq!(rows_affected, 1);
        assert_eq!(
            get_transaction(transaction.id, &connection),
            Err(Error::NotFound)
        )
    }

    #[tokio::test]
    async fn delete_endpoint_returns_ok_for_existing_transaction() {
        let connection = get_test_connection();
        let transaction = create_test_transaction(&connection);
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(connection)),
        };

        let response = delete_transaction_endpoint(State(state), Path(transaction.id))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_endpoint_returns_not_found_for_missing_transaction() {
        let state = DeleteTransactionState {
            db_connection: Arc::new(Mutex::new(get_test_connection())),
        };

        let response = delete_transaction_endpoint(State(state), Path(999))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
