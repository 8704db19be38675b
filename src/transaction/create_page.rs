//! Defines the route handler for the page for recording a new transaction.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use time::{Date, OffsetDateTime};

use crate::{
    AppState, Error,
    category::{Category, get_all_categories},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, dollar_input_styles,
        loading_spinner,
    },
    navigation::NavBar,
    payment_mode::{PaymentMode, get_all_payment_modes},
    timezone::get_local_offset,
    transaction::{
        TransactionType,
        form::{TransactionFormDefaults, transaction_form_fields},
    },
};

fn create_transaction_view(
    max_date: Date,
    available_categories: &[Category],
    available_payment_modes: &[PaymentMode],
) -> Markup {
    let create_transaction_route = endpoints::TRANSACTIONS_API;
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();
    let spinner = loading_spinner();

    let form_fields = transaction_form_fields(
        &TransactionFormDefaults {
            transaction_type: TransactionType::Expense,
            date: max_date,
            max_date,
        },
        available_categories,
        available_payment_modes,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(create_transaction_route)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Transaction" }

                (form_fields)

                button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                {
                    span
                        id="indicator"
                        class="inline htmx-indicator"
                    {
                        (spinner)
                    }
                    " Add Transaction"
                }
            }
        }
    };

    base("New Transaction", &[dollar_input_styles()], &content)
}

/// Shown instead of the form while either lookup table is still empty.
fn missing_master_data_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_TRANSACTION_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            section class="w-full rounded border border-gray-200 bg-white px-4 py-6 text-center shadow-sm dark:border-gray-700 dark:bg-gray-800"
            {
                h2 class="text-xl font-bold mb-2" { "Set up master data first" }

                p class="text-sm text-gray-600 dark:text-gray-400 mb-4"
                {
                    "Every transaction needs a category and a payment mode. \
                    Create at least one of each before recording transactions."
                }

                p class="space-x-4"
                {
                    a href=(endpoints::NEW_CATEGORY_VIEW) class=(LINK_STYLE) { "Create a category" }
                    a href=(endpoints::NEW_PAYMENT_MODE_VIEW) class=(LINK_STYLE) { "Create a payment mode" }
                }
            }
        }
    };

    base("New Transaction", &[], &content)
}

/// The state needed for the new transaction page.
#[derive(Debug, Clone)]
pub struct CreateTransactionPageState {
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The database connection for accessing the lookup tables.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for recording a transaction.
pub async fn get_create_transaction_page(
    State(state): State<CreateTransactionPageState>,
) -> Result<Response, Error> {
    let (available_categories, available_payment_modes) = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        let categories = get_all_categories(&connection).inspect_err(|error| {
            tracing::error!("Failed to retrieve categories for new transaction page: {error}")
        })?;
        let payment_modes = get_all_payment_modes(&connection).inspect_err(|error| {
            tracing::error!("Failed to retrieve payment modes for new transaction page: {error}")
        })?;

        (categories, payment_modes)
    };

    if available_categories.is_empty() || available_payment_modes.is_empty() {
        return Ok(missing_master_data_view().into_response());
    }

    let local_timezone = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone)
    })?;

    let max_date = OffsetDateTime::now_utc().to_offset(local_timezone).date();

    Ok(
        create_transaction_view(max_date, &available_categories, &available_payment_modes)
            .into_response(),
    )
}
