//! Defines the route handler for the page for creating a new payment mode.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, base,
    },
    navigation::NavBar,
};

/// Renders the page for creating a payment mode.
pub async fn get_create_payment_mode_page() -> Response {
    create_payment_mode_view().into_response()
}

fn create_payment_mode_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_PAYMENT_MODE_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-post=(endpoints::POST_PAYMENT_MODE)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-bold" { "New Payment Mode" }

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
                        placeholder="e.g. Cash, Card, Bank Transfer"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Payment Mode" }
            }
        }
    };

    base("Create Payment Mode", &[], &content)
}
