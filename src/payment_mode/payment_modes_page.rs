//! Payment modes listing page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    database_id::PaymentModeId,
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    payment_mode::{PaymentMode, get_all_payment_modes},
};

/// The state needed for the payment modes listing page.
#[derive(Debug, Clone)]
pub struct PaymentModesPageState {
    /// The database connection for managing payment modes.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for PaymentModesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the payment modes listing page with transaction counts.
pub async fn get_payment_modes_page(
    State(state): State<PaymentModesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let payment_modes = get_all_payment_modes(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve payment modes: {error}"))?;

    let transactions_per_mode = count_transactions_per_payment_mode(&connection).inspect_err(
        |error| tracing::error!("Could not count transactions per payment mode: {error}"),
    )?;

    Ok(payment_modes_view(&payment_modes, &transactions_per_mode).into_response())
}

fn count_transactions_per_payment_mode(
    connection: &Connection,
) -> Result<HashMap<PaymentModeId, u32>, Error> {
    let result: Result<HashMap<PaymentModeId, u32>, rusqlite::Error> = connection
        .prepare("SELECT payment_mode_id, COUNT(1) FROM transactions GROUP BY payment_mode_id")?
        .query_map((), |row| {
            let payment_mode_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((payment_mode_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

fn payment_modes_view(
    payment_modes: &[PaymentMode],
    transactions_per_mode: &HashMap<PaymentModeId, u32>,
) -> Markup {
    let new_payment_mode_route = endpoints::NEW_PAYMENT_MODE_VIEW;
    let nav_bar = NavBar::new(endpoints::PAYMENT_MODES_VIEW).into_html();

    let table_row = |payment_mode: &PaymentMode| {
        let transaction_count = *transactions_per_mode.get(&payment_mode.id).unwrap_or(&0);
        let edit_url =
            endpoints::format_endpoint(endpoints::EDIT_PAYMENT_MODE_VIEW, payment_mode.id);
        let delete_url =
            endpoints::format_endpoint(endpoints::DELETE_PAYMENT_MODE, payment_mode.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? {} transaction(s) still reference it.",
            payment_mode.mode, transaction_count
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    (payment_mode.mode)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (transaction_count)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "closest tr",
                            "delete",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl lg:mx-auto"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Payment Modes" }

                    a href=(new_payment_mode_route) class=(LINK_STYLE)
                    {
                        "Create Payment Mode"
                    }
                }

                section class="dark:bg-gray-800 overflow-x-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Mode"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Transactions"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for payment_mode in payment_modes {
                                (table_row(payment_mode))
                            }

                            @if payment_modes.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No payment modes created yet. "
                                        a href=(new_payment_mode_route) class=(LINK_STYLE)
                                        {
                                            "Create your first payment mode"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Payment Modes", &[], &content)
}
