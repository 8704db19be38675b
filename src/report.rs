//! The report page with an overview of the master data tables.

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
    dashboard::linked_stat_card,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    payment_mode::count_payment_modes,
};

/// The state needed for the report page.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for counting master data rows.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Display the master data overview with one card per lookup table.
pub async fn get_report_page(State(state): State<ReportState>) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let payment_mode_count = count_payment_modes(&connection)
        .inspect_err(|error| tracing::error!("could not count payment modes: {error}"))?;
    let category_count = count_categories(&connection)
        .inspect_err(|error| tracing::error!("could not count categories: {error}"))?;

    Ok(report_view(payment_mode_count, category_count).into_response())
}

fn report_view(payment_mode_count: u32, category_count: u32) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORT_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="w-full lg:max-w-6xl lg:mx-auto space-y-4"
            {
                h1 class="text-xl font-bold" { "Report" }

                div class="grid grid-cols-1 gap-4 sm:grid-cols-2 lg:grid-cols-3"
                {
                    (linked_stat_card(
                        endpoints::PAYMENT_MODES_VIEW,
                        "Payment Modes",
                        &payment_mode_count.to_string(),
                        "Total active methods",
                    ))
                    (linked_stat_card(
                        endpoints::CATEGORIES_VIEW,
                        "Categories",
                        &category_count.to_string(),
                        "Total categories",
                    ))
                }
            }
        }
    );

    base("Report", &[], &content)
}

#[cfg(test)]
mod view_tests {
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use rusqlite::Connection;
    use scraper::Selector;

    use crate::{
        category::{CategoryName, create_category},
        db::initialize,
        endpoints,
        payment_mode::create_payment_mode,
        test_utils::{assert_status_ok, assert_valid_html, parse_html_document},
    };

    use super::{ReportState, get_report_page};

    #[tokio::test]
    async fn report_links_master_data_counts() {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        create_category(CategoryName::new_unchecked("Groceries"), &conn).unwrap();
        create_category(CategoryName::new_unchecked("Rent"), &conn).unwrap();
        create_payment_mode("Card", &conn).unwrap();
        let state = ReportState {
            db_connection: Arc::new(Mutex::new(conn)),
        };

        let response = get_report_page(State(state))
            .await
            .expect("Could not get report page");

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let links: Vec<&str> = html
            .select(&Selector::parse("main a").unwrap())
            .filter_map(|a| a.value().attr("href"))
            .collect();
        assert!(links.contains(&endpoints::PAYMENT_MODES_VIEW));
        assert!(links.contains(&endpoints::CATEGORIES_VIEW));

        let text: String = html
            .select(&Selector::parse("main").unwrap())
            .flat_map(|main| main.text())
            .collect();
        assert!(text.contains("Payment Modes"));
        assert!(text.contains('1'));
        assert!(text.contains("Categories"));
        assert!(text.contains('2'));
    }
}
