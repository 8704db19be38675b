//! Defines the endpoint for creating a new payment mode.
use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::{Alert, render_alert},
    endpoints,
    payment_mode::create_payment_mode,
};

/// The state needed to create a payment mode.
#[derive(Debug, Clone)]
pub struct CreatePaymentModeState {
    /// The database connection for managing payment modes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreatePaymentModeState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The form data for creating a payment mode.
#[derive(Debug, Deserialize)]
pub struct PaymentModeForm {
    /// The display name of the payment mode.
    pub mode: String,
}

/// A route handler for creating a new payment mode, redirects to the payment
/// modes view on success.
pub async fn create_payment_mode_endpoint(
    State(state): State<CreatePaymentModeState>,
    Form(form): Form<PaymentModeForm>,
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

    if let Err(error) = create_payment_mode(mode, &connection) {
        tracing::error!("could not create payment mode: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::PAYMENT_MODES_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Form, extract::State, http::StatusCode, response::IntoResponse};
    use rusqlite::Connection;

    use crate::{
        endpoints,
        payment_mode::{
            create_payment_mode_endpoint, create_payment_modes_table, get_payment_mode,
        },
        test_utils::assert_hx_redirect,
    };

    use super::{CreatePaymentModeState, PaymentModeForm};

    fn get_test_state() -> CreatePaymentModeState {
        let conn = Connection::open_in_memory().unwrap();
        create_payment_modes_table(&conn).unwrap();

        CreatePaymentModeState {
            db_connection: Arc::new(Mutex::new(conn)),
        }
    }

    #[tokio::test]
    async fn can_create_payment_mode() {
        let state = get_test_state();
        let form = PaymentModeForm {
            mode: "Bank Transfer".to_owned(),
        };

        let response = create_payment_mode_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(&response, endpoints::PAYMENT_MODES_VIEW);

        let payment_mode = get_payment_mode(1, &state.db_connection.lock().unwrap())
            .expect("could not get payment mode from database");
        assert_eq!(payment_mode.mode, "Bank Transfer");
    }

    #[tokio::test]
    async fn create_payment_mode_trims_whitespace() {
        let state = get_test_state();
        let form = PaymentModeForm {
            mode: "  Cash ".to_owned(),
        };

        create_payment_mode_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        let payment_mode = get_payment_mode(1, &state.db_connection.lock().unwrap())
            .expect("could not get payment mode from database");
        assert_eq!(payment_mode.mode, "Cash");
    }

    #[tokio::test]
    async fn create_payment_mode_fails_on_blank_name() {
        let state = get_test_state();
        let form = PaymentModeForm {
            mode: "   ".to_owned(),
        };

        let response = create_payment_mode_endpoint(State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_payment_mode_fails_on_duplicate() {
        let state = get_test_state();
        let form = PaymentModeForm {
            mode: "Cash".to_owned(),
        };
        create_payment_mode_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        let duplicate_form = PaymentModeForm {
            mode: "Cash".to_owned(),
        };
        let response = create_payment_mode_endpoint(State(state), Form(duplicate_form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
