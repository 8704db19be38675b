//! Card components shared by the dashboard and report pages.

use maud::{Markup, html};

/// Renders a single summary card with a title, a large value, and a caption.
pub(crate) fn stat_card(title: &str, value: &str, caption: &str) -> Markup {
    html! {
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                   dark:border-gray-700 rounded-lg p-5 shadow-md
                   hover:shadow-lg transition-shadow h-32
                   flex flex-col justify-between"
            aria-label=(format!("{title}: {value}, {caption}"))
        {
            h3 class="text-sm font-medium text-gray-600 dark:text-gray-400" { (title) }

            div
            {
                div class="text-2xl font-bold" { (value) }

                p class="text-xs text-gray-600 dark:text-gray-400 mt-0.5" { (caption) }
            }
        }
    }
}

/// A [stat_card] wrapped in a link to the page with the underlying data.
pub(crate) fn linked_stat_card(url: &str, title: &str, value: &str, caption: &str) -> Markup {
    html! {
        a href=(url) class="block"
        {
            (stat_card(title, value, caption))
        }
    }
}
