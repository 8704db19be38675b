//! The transactions ledger page with search and delete.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, endpoints,
    html::{
        BUTTON_DELETE_STYLE, EXPENSE_BADGE_STYLE, FORM_TEXT_INPUT_STYLE, INCOME_BADGE_STYLE,
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, format_currency, format_date,
    },
    navigation::NavBar,
    transaction::{
        TransactionType,
        query::{TransactionListRow, filter_transactions, get_recent_transactions},
    },
};

const DELETE_CONFIRM_MESSAGE: &str =
    "This action cannot be undone. This will permanently delete this transaction record.";

/// The state needed for the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsPageState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The maximum number of rows the page fetches.
    pub transaction_limit: u32,
}

impl FromRef<AppState> for TransactionsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            transaction_limit: state.transaction_limit,
        }
    }
}

/// The query string for the transactions page.
#[derive(Debug, Default, Deserialize)]
pub struct TransactionsQuery {
    /// Case-insensitive text to match against descriptions and category names.
    #[serde(default)]
    pub search: Option<String>,
}

/// Display the most recent transactions, optionally filtered by a search term.
pub async fn get_transactions_page(
    State(state): State<TransactionsPageState>,
    Query(query): Query<TransactionsQuery>,
) -> Result<Response, Error> {
    let rows = {
        let connection = state
            .db_connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        get_recent_transactions(state.transaction_limit, &connection)
            .inspect_err(|error| tracing::error!("Failed to retrieve transactions: {error}"))?
    };

    let search = query.search.unwrap_or_default();
    let ledger_is_empty = rows.is_empty();
    let rows = filter_transactions(rows, &search);

    Ok(transactions_view(&rows, &search, ledger_is_empty).into_response())
}

fn type_badge(transaction_type: TransactionType) -> Markup {
    match transaction_type {
        TransactionType::Income => html!(
            span class=(INCOME_BADGE_STYLE) { "Income" }
        ),
        TransactionType::Expense => html!(
            span class=(EXPENSE_BADGE_STYLE) { "Expense" }
        ),
    }
}

fn amount_cell_text(row: &TransactionListRow) -> (String, &'static str) {
    match row.transaction_type {
        TransactionType::Income => (
            format!("+{}", format_currency(row.amount)),
            "text-green-600 dark:text-green-400",
        ),
        TransactionType::Expense => (
            format_currency(-row.amount),
            "text-red-600 dark:text-red-400",
        ),
    }
}

fn transaction_table_row(row: &TransactionListRow) -> Markup {
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, row.id);
    let (amount_text, amount_style) = amount_cell_text(row);

    html!(
        tr class=(TABLE_ROW_STYLE)
        {
            td class="px-6 py-4 whitespace-nowrap font-medium" { (format_date(row.date)) }

            td class=(TABLE_CELL_STYLE) { (type_badge(row.transaction_type)) }

            td class=(TABLE_CELL_STYLE) { (row.category_name) }

            td class=(TABLE_CELL_STYLE) { (row.payment_mode) }

            td class="px-6 py-4 max-w-[300px] truncate text-gray-500 dark:text-gray-400"
            {
                (row.description.as_deref().unwrap_or("—"))
            }

            td class=(format!("px-6 py-4 text-right font-bold font-mono {amount_style}"))
            {
                (amount_text)
            }

            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-confirm=(DELETE_CONFIRM_MESSAGE)
                    hx-target="closest tr"
                    hx-swap="delete"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    )
}

fn empty_table_row(search: &str, ledger_is_empty: bool) -> Markup {
    html!(
        tr
        {
            td
                colspan="7"
                class="px-6 py-8 text-center text-gray-500 dark:text-gray-400"
            {
                @if ledger_is_empty {
                    "No transactions recorded yet. "
                    a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                    {
                        "Record your first transaction"
                    }
                } @else {
                    "No transactions found for '" (search) "'."
                }
            }
        }
    )
}

fn transactions_view(rows: &[TransactionListRow], search: &str, ledger_is_empty: bool) -> Markup {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-6xl lg:mx-auto" id="transactions-table"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Recent Transactions" }

                    div class="flex items-center gap-4"
                    {
                        form method="get" action=(endpoints::TRANSACTIONS_VIEW) class="w-64"
                        {
                            input
                                name="search"
                                type="search"
                                placeholder="Search description or category..."
                                value=(search)
                                hx-get=(endpoints::TRANSACTIONS_VIEW)
                                hx-trigger="input changed delay:300ms, search"
                                hx-target="#transactions-table"
                                hx-select="#transactions-table"
                                hx-swap="outerHTML"
                                class=(FORM_TEXT_INPUT_STYLE);
                        }

                        a href=(endpoints::NEW_TRANSACTION_VIEW) class=(LINK_STYLE)
                        {
                            "New Transaction"
                        }
                    }
                }

                section class="dark:bg-gray-800 overflow-x-auto rounded border border-gray-200 dark:border-gray-700"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Mode" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class="px-6 py-4 text-right" { "Amount" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "" }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (transaction_table_row(row))
                            }

                            @if rows.is_empty() {
                                (empty_table_row(search, ledger_is_empty))
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}
