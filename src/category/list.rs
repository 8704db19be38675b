//! Categories listing page.

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
    category::{Category, get_all_categories},
    database_id::CategoryId,
    endpoints,
    html::{
        LINK_STYLE, NAME_BADGE_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links,
    },
    navigation::NavBar,
};

/// The state needed for the categories listing page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// A category with its formatted edit URL for template rendering.
#[derive(Debug, Clone)]
struct CategoryWithEditUrl {
    pub category: Category,
    pub edit_url: String,
    pub transaction_count: u32,
}

/// Render the categories listing page with transaction counts.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let categories = get_all_categories(&connection)
        .inspect_err(|error| tracing::error!("Failed to retrieve categories: {error}"))?;

    let transactions_per_category = count_transactions_per_category(&connection)
        .inspect_err(|error| tracing::error!("Could not count transactions per category: {error}"))?;

    let categories_with_edit_urls = categories
        .into_iter()
        .map(|category| {
            let transaction_count = *transactions_per_category.get(&category.id).unwrap_or(&0);

            CategoryWithEditUrl {
                edit_url: endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id),
                category,
                transaction_count,
            }
        })
        .collect::<Vec<_>>();

    Ok(categories_view(&categories_with_edit_urls).into_response())
}

fn count_transactions_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare("SELECT category_id, COUNT(1) FROM transactions GROUP BY category_id")?
        .query_map((), |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

fn delete_confirm_message(category: &CategoryWithEditUrl) -> String {
    format!(
        "Are you sure you want to delete '{}'? {} transaction(s) still reference it.",
        category.category.name, category.transaction_count
    )
}

fn categories_view(categories: &[CategoryWithEditUrl]) -> Markup {
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let table_row = |category_with_url: &CategoryWithEditUrl| {
        let delete_url = endpoints::format_endpoint(
            endpoints::DELETE_CATEGORY,
            category_with_url.category.id,
        );

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    span class=(NAME_BADGE_STYLE)
                    {
                        (category_with_url.category.name)
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (category_with_url.transaction_count)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &category_with_url.edit_url,
                            &delete_url,
                            &delete_confirm_message(category_with_url),
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
            section class="space-y-4"
            {
                header class="flex justify-between flex-wrap items-end"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    a href=(new_category_route) class=(LINK_STYLE)
                    {
                        "Create Category"
                    }
                }

                (categories_cards_view(categories, new_category_route))

                section class="hidden lg:block dark:bg-gray-800 lg:max-w-5xl lg:w-full lg:mx-auto"
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
                                    "Name"
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
                            @for category_with_url in categories {
                                (table_row(category_with_url))
                            }

                            @if categories.is_empty() {
                                tr
                                {
                                    td
                                        colspan="3"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No categories created yet. "
                                        a href=(new_category_route) class=(LINK_STYLE)
                                        {
                                            "Create your first category"
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

    base("Categories", &[], &content)
}

fn categories_cards_view(categories: &[CategoryWithEditUrl], new_category_route: &str) -> Markup {
    html!(
        ul class="lg:hidden space-y-4"
        {
            @for category_with_url in categories {
                li class="rounded border border-gray-200 bg-white px-4 py-3 shadow-sm dark:border-gray-700 dark:bg-gray-800"
                    data-category-card="true"
                {
                    div class="flex items-start justify-between gap-3"
                    {
                        span class=(NAME_BADGE_STYLE) { (category_with_url.category.name) }
                        span class="text-sm tabular-nums text-gray-900 dark:text-white"
                        { (category_with_url.transaction_count) }
                    }

                    div class="mt-2 flex items-center gap-4 text-sm"
                    {
                        (edit_delete_action_links(
                            &category_with_url.edit_url,
                            &endpoints::format_endpoint(
                                endpoints::DELETE_CATEGORY,
                                category_with_url.category.id,
                            ),
                            &delete_confirm_message(category_with_url),
                            "closest [data-category-card='true']",
                            "outerHTML",
                        ))
                    }
                }
            }

            @if categories.is_empty() {
                li class="rounded border border-dashed border-gray-300 bg-white px-4 py-6 text-center text-sm text-gray-500 dark:border-gray-700 dark:bg-gray-800 dark:text-gray-400"
                {
                    "No categories created yet. "
                    a href=(new_category_route) class=(LINK_STYLE)
                    {
                        "Create your first category"
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        category::{CategoryName, create_category, list::count_transactions_per_category},
        db::initialize,
        payment_mode::create_payment_mode,
        transaction::{Transaction, TransactionType, create_transaction},
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize test database");
        connection
    }

    #[test]
    fn counts_transactions_per_category() {
        let connection = get_test_db_connection();
        let groceries = create_category(CategoryName::new_unchecked("Groceries"), &connection)
            .expect("Could not create test category");
        let rent = create_category(CategoryName::new_unchecked("Rent"), &connection)
            .expect("Could not create test category");
        let card =
            create_payment_mode("Card", &connection).expect("Could not create payment mode");
        let want_groceries_count = 3;
        let want_rent_count = 2;
        for i in 0..want_groceries_count {
            create_transaction(
                Transaction::build(
                    (i + 1) as f64,
                    date!(2026 - 01 - 05),
                    TransactionType::Expense,
                    groceries.id,
                    card.id,
                ),
                &connection,
            )
            .unwrap();
        }
        for i in 0..want_rent_count {
            create_transaction(
                Transaction::build(
                    (i + 1) as f64,
                    date!(2026 - 01 - 05),
                    TransactionType::Expense,
                    rent.id,
                    card.id,
                ),
                &connection,
            )
            .unwrap();
        }

        let counts = count_transactions_per_category(&connection).unwrap();

        assert_eq!(want_groceries_count, counts[&groceries.id]);
        assert_eq!(want_rent_count, counts[&rent.id]);
    }
}
