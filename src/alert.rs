//! Alert fragments for showing success and error messages to users.
//!
//! Alerts are rendered as HTML fragments and swapped into the fixed alert
//! container in the page layout, either directly by a handler or via the
//! htmx response-targets extension for error status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const SUCCESS_ALERT_STYLE: &str = "flex items-start justify-between gap-3 p-4 mb-4 \
    text-sm text-green-800 rounded-lg bg-green-50 border border-green-300 \
    dark:bg-gray-800 dark:text-green-400 dark:border-green-800";

const ERROR_ALERT_STYLE: &str = "flex items-start justify-between gap-3 p-4 mb-4 \
    text-sm text-red-800 rounded-lg bg-red-50 border border-red-300 \
    dark:bg-gray-800 dark:text-red-400 dark:border-red-800";

/// An alert message to display to the user.
pub enum Alert {
    /// A success message with no further details.
    SuccessSimple {
        /// The headline of the alert.
        message: String,
    },
    /// An error message with details on what went wrong and how to fix it.
    Error {
        /// The headline of the alert.
        message: String,
        /// Details on what went wrong and what the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    fn into_markup(self) -> Markup {
        let (style, message, details) = match self {
            Alert::SuccessSimple { message } => (SUCCESS_ALERT_STYLE, message, None),
            Alert::Error { message, details } => (ERROR_ALERT_STYLE, message, Some(details)),
        };

        html! {
            div role="alert" class=(style)
            {
                div
                {
                    p class="font-medium" { (message) }

                    @if let Some(details) = details {
                        p class="mt-1" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    onclick="this.closest('div[role=alert]').remove()"
                    class="font-bold bg-transparent border-none cursor-pointer"
                {
                    "✕"
                }
            }
        }
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        self.into_markup().into_response()
    }
}

/// Render `alert` as an HTML fragment response with the given status code.
pub(crate) fn render_alert(status: StatusCode, alert: Alert) -> Response {
    (status, alert.into_markup()).into_response()
}
