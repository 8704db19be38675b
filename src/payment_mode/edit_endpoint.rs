//! Defines the endpoint for updating a payment mode.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::{Alert, render_alert},
    database_id::PaymentModeId,
    endpoints,
};

/// The state needed to edit a payment mode.
#[derive(Debug, Clone)]
pub struct EditPaymentModeState {
    /// The database connection for managing payment modes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPaymentModeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EditPaymentModeForm {
    mode: String,
}

pub async fn edit_payment_mode_endpoint(
    State(state): State<EditPaymentModeState>,
    Path(payment_mode_id): Path<PaymentModeId>,
    Form(form): Form<EditPaymentModeForm>,
) -> Response {
    let mode = form.mode.trim();

    if mode.is_empty() {
        return render_alert(
            StatusCode::BAD_REQUEST,
            Alert::error(
                "Invalid payment mode",
                "The payment mode name cannot be empty.",
            ),
        );
    }

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_payment_mode(payment_mode_id, mode, &connection) {
        Ok(rows_affected) if rows_affected != 0 => (
            HxRedirect(endpoints::PAYMENT_MODES_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Ok(_) => Error::UpdateMissingPaymentMode.into_alert_response(),
        Err(error) => {
            tracing::error!("Could not update payment mode {payment_mode_id}: {error}");
            error.into_alert_response()
        }
    }
}

type RowsAffected = usize;

fn update_payment_mode(
    id: PaymentModeId,
    mode: &str,
    connection: &Connection,
) -> Result<RowsAffected, Error> {
    connection
        .execute(
            "UPDATE payment_modes SET mode = ?1 WHERE id = ?2",
            (mode, id),
        )
        .map_err(|error| match error {
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                },
                _,
            ) => Error::DuplicatePaymentMode(mode.to_owned()),
            error => error.into(),
        })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
    };
    use rusqlite::Connection;

    use crate::{
        endpoints,
        payment_mode::{
            create_payment_mode, create_payment_modes_table, edit_payment_mode_endpoint,
            get_payment_mode,
        },
        test_utils::assert_hx_redirect,
    };

    use super::{EditPaymentModeForm, EditPaymentModeState};

    fn get_test_state() -> EditPaymentModeState {
        let conn = Connection::open_in_memory().unwrap();
        create_payment_modes_table(&conn).unwrap();

        EditPaymentModeState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_rename_payment_mode() {
        let state = get_test_state();
        let payment_mode = create_payment_mode("Crd", &state.db_connection.lock().unwrap())
            .expect("Could not create test payment mode");

        let form = EditPaymentModeForm {
            mode: "Card".to_owned(),
        };
        let response =
            edit_payment_mode_endpoint(State(state.clone()), Path(payment_mode.id), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::PAYMENT_MODES_VIEW);

        let renamed = get_payment_mode(payment_mode.id, &state.db_connection.lock().unwrap())
            .expect("Could not get renamed payment mode");
        assert_eq!(renamed.mode, "Card");
    }

    #[tokio::test]
    async fn update_missing_payment_mode_returns_not_found() {
        let state = get_test_state();
        let form = EditPaymentModeForm {
            mode: "Anything".to_owned(),
        };

        let response = edit_payment_mode_endpoint(State(state), Path(999), Form(form)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn update_to_blank_name_is_rejected() {
        let state = get_test_state();
        let payment_mode = create_payment_mode("Card", &state.db_connection.lock().unwrap())
            .expect("Could not create test payment mode");

        let form = EditPaymentModeForm {
            mode: "  ".to_owned(),
        };
        let response =
            edit_payment_mode_endpoint(State(state.clone()), Path(payment_mode.id), Form(form))
                .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let unchanged = get_payment_mode(payment_mode.id, &state.db_connection.lock().unwrap())
            .expect("Could not get payment mode");
        assert_eq!(unchanged.mode, "Card");
    }
}
