//! Dashboard HTTP handler and view rendering.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::count_categories,
    dashboard::stat_card,
    endpoints,
    html::{LINK_STYLE, PAGE_CONTAINER_STYLE, base, format_currency},
    navigation::NavBar,
    payment_mode::count_payment_modes,
    transaction::count_transactions,
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading summary data.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Income and expense totals across all recorded transactions.
#[derive(Debug, PartialEq)]
struct TransactionTotals {
    income: f64,
    expenses: f64,
}

impl TransactionTotals {
    fn net(&self) -> f64 {
        self.income - self.expenses
    }
}

/// Display a page with an overview of the recorded data.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    let transaction_count = count_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;

    if transaction_count == 0 {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    let totals = get_transaction_totals(&connection)
        .inspect_err(|error| tracing::error!("could not get transaction totals: {error}"))?;
    let category_count = count_categories(&connection)
        .inspect_err(|error| tracing::error!("could not count categories: {error}"))?;
    let payment_mode_count = count_payment_modes(&connection)
        .inspect_err(|error| tracing::error!("could not count payment modes: {error}"))?;

    Ok(dashboard_view(
        nav_bar,
        &totals,
        transaction_count,
        category_count,
        payment_mode_count,
    )
    .into_response())
}

fn get_transaction_totals(connection: &Connection) -> Result<TransactionTotals, Error> {
    connection
        .query_row(
            "SELECT
                COALESCE(SUM(CASE WHEN type = 'income' THEN amount ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN type = 'expense' THEN amount ELSE 0 END), 0)
             FROM transactions",
            [],
            |row| {
                Ok(TransactionTotals {
                    income: row.get(0)?,
                    expenses: row.get(1)?,
                })
            },
        )
        .map_err(|error| error.into())
}

fn dashboard_view(
    nav_bar: NavBar,
    totals: &TransactionTotals,
    transaction_count: u32,
    category_count: u32,
    payment_mode_count: u32,
) -> Markup {
    let net = totals.net();
    let net_caption = if net >= 0.0 {
        "You are in the black"
    } else {
        "You are in the red"
    };

    let content = html!(
        (nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-6xl lg:mx-auto space-y-4"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                div class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3"
                {
                    (stat_card(
                        "Income",
                        &format_currency(totals.income),
                        "Total recorded income",
                    ))
                    (stat_card(
                        "Expenses",
                        &format_currency(totals.expenses),
                        "Total recorded expenses",
                    ))
                    (stat_card("Net", &format_currency(net), net_caption))
                }

                div class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3"
                {
                    (stat_card(
                        "Transactions",
                        &transaction_count.to_string(),
                        "Total recorded transactions",
                    ))
                    (stat_card(
                        "Categories",
                        &category_count.to_string(),
                        "Total categories",
                    ))
                    (stat_card(
                        "Payment Modes",
                        &payment_mode_count.to_string(),
                        "Total active methods",
                    ))
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}

fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let content = html!(
        (nav_bar.into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full max-w-md mx-auto rounded border border-gray-200 bg-white px-4 py-8 text-center shadow-sm dark:border-gray-700 dark:bg-gray-800"
            {
                h1 class="text-xl font-bold mb-2" { "Nothing here yet" }

                p class="text-sm text-gray-600 dark:text-gray-400 mb-4"
                {
                    "Record your first transaction to see income, expense, and net summaries."
                }

                a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                {
                    "Record a transaction"
                }
            }
        }
    );

    base("Dashboard", &[], &content)
}
