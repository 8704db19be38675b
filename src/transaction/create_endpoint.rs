//! Defines the endpoint for recording a new transaction.
use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
// Must use axum_extra's Form since that parses an empty string as None instead
// of crashing like axum::Form.
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    alert::{Alert, render_alert},
    category::get_category,
    database_id::{CategoryId, PaymentModeId},
    endpoints,
    payment_mode::get_payment_mode,
    timezone::get_local_offset,
    transaction::{Transaction, TransactionType, core::create_transaction},
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// The date when the transaction occurred.
    pub date: Date,
    /// Whether money was earned or spent.
    pub type_: TransactionType,
    /// The ID of the category to file this transaction under.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// The ID of the payment mode the transaction was made with.
    #[serde(default)]
    pub payment_mode_id: Option<PaymentModeId>,
    /// Text detailing the transaction.
    #[serde(default)]
    pub description: Option<String>,
}

/// A route handler for recording a new transaction, redirects to the
/// transactions view on success.
///
/// The form is validated the same way the page validates it client-side: the
/// date must not be in the future, the amount must be positive, and both
/// lookup selections must refer to existing rows.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let Some(local_timezone) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let now_local_time = OffsetDateTime::now_utc().to_offset(local_timezone);

    if form.date > now_local_time.date() {
        tracing::error!("Tried to record a transaction with a future date");

        return Error::FutureDate(form.date).into_alert_response();
    }

    if !(form.amount > 0.0) {
        return Error::NonPositiveAmount(form.amount).into_alert_response();
    }

    let Some(category_id) = form.category_id else {
        return render_alert(
            StatusCode::BAD_REQUEST,
            Alert::error("Missing category", "Select a category and try again."),
        );
    };

    let Some(payment_mode_id) = form.payment_mode_id else {
        return render_alert(
            StatusCode::BAD_REQUEST,
            Alert::error("Missing payment mode", "Select a payment mode and try again."),
        );
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if get_category(category_id, &connection) == Err(Error::NotFound) {
        return Error::InvalidCategory(category_id).into_alert_response();
    }

    if get_payment_mode(payment_mode_id, &connection) == Err(Error::NotFound) {
        return Error::InvalidPaymentMode(payment_mode_id).into_alert_response();
    }

    let transaction = Transaction::build(
        form.amount,
        form.date,
        form.type_,
        category_id,
        payment_mode_id,
    )
    .description(form.description);

    if let Err(error) = create_transaction(transaction, &connection) {
        tracing::error!("could not create transaction: {error}");

        return error.into_alert_response();
    }

    (
        HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{body::Body, extract::State, http::Response, http::StatusCode, response::IntoResponse};
    use axum_extra::extract::Form;
    use axum_htmx::HX_REDIRECT;
    use rusqlite::Connection;
    use time::{Duration, OffsetDateTime};

    use crate::{
        category::{CategoryName, create_category},
        database_id::{CategoryId, PaymentModeId},
        db::initialize,
        payment_mode::create_payment_mode,
        transaction::{
            TransactionType,
            create_endpoint::{CreateTransactionState, TransactionForm},
            create_transaction_endpoint, get_transaction,
        },
    };

    fn get_test_state() -> (CreateTransactionState, CategoryId, PaymentModeId) {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        let category = create_category(CategoryName::new_unchecked("Groceries"), &conn)
            .expect("Could not create test category");
        let payment_mode =
            create_payment_mode("Card", &conn).expect("Could not create test payment mode");

        (
            CreateTransactionState {
                db_connection: Arc::new(Mutex::new(conn)),
                local_timezone: "Etc/UTC".to_owned(),
            },
            category.id,
            payment_mode.id,
        )
    }

    fn valid_form(category_id: CategoryId, payment_mode_id: PaymentModeId) -> TransactionForm {
        TransactionForm {
            amount: 12.3,
            date: OffsetDateTime::now_utc().date(),
            type_: TransactionType::Expense,
            category_id: Some(category_id),
            payment_mode_id: Some(payment_mode_id),
            description: Some("test transaction".to_owned()),
        }
    }

    #[tokio::test]
    async fn can_create_transaction() {
        let (state, category_id, payment_mode_id) = get_test_state();

        let form = valid_form(category_id, payment_mode_id);
        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_redirects_to_transactions_view(response);

        // Verify the transaction was actually created by getting it by ID
        // We know the first transaction will have ID 1
        let connection = state.db_connection.lock().unwrap();
        let transaction = get_transaction(1, &connection).unwrap();
        assert_eq!(transaction.amount, 12.3);
        assert_eq!(transaction.transaction_type, TransactionType::Expense);
        assert_eq!(transaction.description.as_deref(), Some("test transaction"));
        assert_eq!(transaction.category_id, category_id);
        assert_eq!(transaction.payment_mode_id, payment_mode_id);
    }

    #[tokio::test]
    async fn rejects_future_date() {
        let (state, category_id, payment_mode_id) = get_test_state();

        let form = TransactionForm {
            date: OffsetDateTime::now_utc().date() + Duration::days(1),
            ..valid_form(category_id, payment_mode_id)
        };
        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_nothing_created(&state);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let (state, category_id, payment_mode_id) = get_test_state();

        for amount in [0.0, -5.0] {
            let form = TransactionForm {
                amount,
                ..valid_form(category_id, payment_mode_id)
            };
            let response = create_transaction_endpoint(State(state.clone()), Form(form))
                .await
                .into_response();

            assert_eq!(
                response.status(),
                StatusCode::BAD_REQUEST,
                "want amount {amount} to be rejected"
            );
        }

        assert_nothing_created(&state);
    }

    #[tokio::test]
    async fn rejects_missing_category() {
        let (state, _, payment_mode_id) = get_test_state();

        let form = TransactionForm {
            category_id: None,
            ..valid_form(1, payment_mode_id)
        };
        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_nothing_created(&state);
    }

    #[tokio::test]
    async fn rejects_unknown_payment_mode() {
        let (state, category_id, _) = get_test_state();

        let form = TransactionForm {
            payment_mode_id: Some(999),
            ..valid_form(category_id, 1)
        };
        let response = create_transaction_endpoint(State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_nothing_created(&state);
    }

    #[track_caller]
    fn assert_nothing_created(state: &CreateTransactionState) {
        let connection = state.db_connection.lock().unwrap();
        assert!(get_transaction(1, &connection).is_err());
    }

    #[track_caller]
    fn assert_redirects_to_transactions_view(response: Response<Body>) {
        let location = response
            .headers()
            .get(HX_REDIRECT)
            .expect("expected response to have the header hx-redirect");
        assert_eq!(
            location, "/transactions",
            "got redirect to {location:?}, want redirect to /transactions"
        );
    }
}
