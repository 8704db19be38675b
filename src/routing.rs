//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_edit_category_page, get_new_category_page, update_category_endpoint,
    },
    dashboard::get_dashboard_page,
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    payment_mode::{
        create_payment_mode_endpoint, delete_payment_mode_endpoint, edit_payment_mode_endpoint,
        get_create_payment_mode_page, get_edit_payment_mode_page, get_payment_modes_page,
    },
    report::get_report_page,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, get_create_transaction_page,
        get_transactions_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let view_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::REPORT_VIEW, get(get_report_page))
        .route(endpoints::TRANSACTIONS_VIEW, get(get_transactions_page))
        .route(
            endpoints::NEW_TRANSACTION_VIEW,
            get(get_create_transaction_page),
        )
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(endpoints::PAYMENT_MODES_VIEW, get(get_payment_modes_page))
        .route(
            endpoints::NEW_PAYMENT_MODE_VIEW,
            get(get_create_payment_mode_page),
        )
        .route(
            endpoints::EDIT_PAYMENT_MODE_VIEW,
            get(get_edit_payment_mode_page),
        )
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(
            endpoints::TRANSACTIONS_API,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
        .route(endpoints::PUT_CATEGORY, put(update_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::POST_PAYMENT_MODE,
            post(create_payment_mode_endpoint),
        )
        .route(
            endpoints::PUT_PAYMENT_MODE,
            put(edit_payment_mode_endpoint),
        )
        .route(
            endpoints::DELETE_PAYMENT_MODE,
            delete(delete_payment_mode_endpoint),
        );

    view_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}


#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::OffsetDateTime;

    use crate::{AppState, DEFAULT_TRANSACTION_LIMIT, endpoints};

    use super::build_router;

    fn get_test_server() -> TestServer {
        let connection =
            Connection::open_in_memory().expect("Could not open in-memory SQLite database");
        let state = AppState::new(connection, "Etc/UTC", DEFAULT_TRANSACTION_LIMIT)
            .expect("Could not create app state");

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn unknown_route_returns_404_page() {
        let server = get_test_server();

        let response = server.get("/no-such-page").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("404"));
    }

    #[tokio::test]
    async fn record_search_and_delete_transaction_flow() {
        let server = get_test_server();
        let today = OffsetDateTime::now_utc().date().to_string();

        // Master data first: a transaction needs a category and a payment mode.
        let response = server
            .post(endpoints::POST_CATEGORY)
            .form(&[("name", "Groceries")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        let response = server
            .post(endpoints::POST_PAYMENT_MODE)
            .form(&[("mode", "Card")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        // Record a transaction against the new master data.
        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[
                ("amount", "42.50"),
                ("date", today.as_str()),
                ("type_", "expense"),
                ("category_id", "1"),
                ("payment_mode_id", "1"),
                ("description", "weekly shop"),
            ])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("hx-redirect"),
            endpoints::TRANSACTIONS_VIEW
        );

        // The ledger shows the new transaction with its joined lookup names.
        let response = server.get(endpoints::TRANSACTIONS_VIEW).await;
        response.assert_status_ok();
        let page = response.text();
        assert!(page.contains("Groceries"));
        assert!(page.contains("Card"));
        assert!(page.contains("weekly shop"));
        assert!(page.contains("-$42.50"));

        // Search filters within the fetched rows.
        let response = server
            .get(endpoints::TRANSACTIONS_VIEW)
            .add_query_param("search", "zzz")
            .await;
        response.assert_status_ok();
        assert!(response.text().contains("No transactions found for 'zzz'."));

        // Delete the transaction, then deleting again reports not found.
        let delete_path = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, 1);
        let response = server.delete(&delete_path).await;
        response.assert_status_ok();

        let response = server.delete(&delete_path).await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn transaction_with_unknown_category_is_rejected() {
        let server = get_test_server();
        let today = OffsetDateTime::now_utc().date().to_string();

        server
            .post(endpoints::POST_PAYMENT_MODE)
            .form(&[("mode", "Card")])
            .await;

        let response = server
            .post(endpoints::TRANSACTIONS_API)
            .form(&[
                ("amount", "10.00"),
                ("date", today.as_str()),
                ("type_", "expense"),
                ("category_id", "42"),
                ("payment_mode_id", "1"),
            ])
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn category_can_be_renamed_and_deleted() {
        let server = get_test_server();

        server
            .post(endpoints::POST_CATEGORY)
            .form(&[("name", "Transprot")])
            .await;

        let put_path = endpoints::format_endpoint(endpoints::PUT_CATEGORY, 1);
        let response = server
            .put(&put_path)
            .form(&[("name", "Transport")])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);

        let response = server.get(endpoints::CATEGORIES_VIEW).await;
        assert!(response.text().contains("Transport"));

        let delete_path = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, 1);
        let response = server.delete(&delete_path).await;
        response.assert_status_ok();

        let response = server.get(endpoints::CATEGORIES_VIEW).await;
        assert!(response.text().contains("No categories created yet."));
    }
}
