//! Defines the route handler for the page for editing a payment mode.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::PaymentModeId,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
    payment_mode::{PaymentMode, get_payment_mode},
};

/// The state needed for the payment mode edit page.
#[derive(Debug, Clone)]
pub struct EditPaymentModePageState {
    /// The database connection for managing payment modes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditPaymentModePageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a payment mode with the current name prefilled.
pub async fn get_edit_payment_mode_page(
    Path(payment_mode_id): Path<PaymentModeId>,
    State(state): State<EditPaymentModePageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let payment_mode = get_payment_mode(payment_mode_id, &connection)?;

    Ok(edit_payment_mode_view(&payment_mode).into_response())
}

fn edit_payment_mode_view(payment_mode: &PaymentMode) -> Markup {
    let nav_bar = NavBar::new(endpoints::PAYMENT_MODES_VIEW).into_html();
    let update_url = endpoints::format_endpoint(endpoints::PUT_PAYMENT_MODE, payment_mode.id);

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "Edit Payment Mode" }

                div
                {
                    label
                        for="mode"
                        class=(FORM_LABEL_STYLE)
                    {
                        "Payment Mode"
                    }

                    input
                        id="mode"
                        type="text"
                        name="mode"
                        value=(payment_mode.mode)
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Payment Mode" }
            }
        }
    };

    base("Edit Payment Mode", &[], &content)
}
