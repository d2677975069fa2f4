//! The page shell and the Tailwind class sets shared by the dashboard views.

use maud::{DOCTYPE, Markup, html};

pub const BUTTON_PRIMARY_STYLE: &str = "w-full px-4 py-2 rounded font-medium text-white \
    bg-blue-500 dark:bg-blue-600 disabled:bg-blue-700 \
    hover:enabled:bg-blue-600 hover:enabled:dark:bg-blue-700";

pub const FORM_LABEL_STYLE: &str = "block mb-2 text-sm font-medium text-gray-900 dark:text-white";

/// Shared by file inputs and selects.
pub const FORM_TEXT_INPUT_STYLE: &str = "block w-full p-2.5 rounded text-sm \
    text-gray-900 dark:text-white bg-gray-50 dark:bg-gray-700 \
    border border-gray-300 dark:border-gray-600 \
    focus:ring-blue-600 focus:border-blue-600";

pub const TABLE_HEADER_STYLE: &str = "sticky top-0 text-xs uppercase \
    text-gray-700 dark:text-gray-400 bg-gray-100 dark:bg-gray-700";

pub const TABLE_ROW_STYLE: &str = "border-b bg-white dark:bg-gray-800 dark:border-gray-700";

pub const TABLE_CELL_STYLE: &str = "px-4 py-2 whitespace-nowrap";

pub const PAGE_CONTAINER_STYLE: &str =
    "flex flex-col items-center gap-4 px-6 py-8 mx-auto text-gray-900 dark:text-white";

const HTMX_URL: &str = "https://unpkg.com/htmx.org@2.0.8/dist/htmx.min.js";
const HTMX_RESPONSE_TARGETS_URL: &str =
    "https://unpkg.com/htmx-ext-response-targets@2.0.4/dist/response-targets.js";
const TAILWIND_URL: &str = "https://cdn.jsdelivr.net/npm/@tailwindcss/browser@4";

/// Extra elements a page adds to the document head.
pub enum HeadElement {
    /// The path or URL of a JavaScript file.
    ScriptLink(&'static str),
}

/// Wrap `content` in the HTML document every page shares.
///
/// The document loads htmx with the response-targets extension, so error
/// responses can be swapped into `#alert-container`.
pub fn base(title: &str, head_elements: &[HeadElement], content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - Plotboard" }
                link href="/static/style.css" rel="stylesheet";

                script src=(HTMX_URL) {}
                script src=(HTMX_RESPONSE_TARGETS_URL) {}
                script src=(TAILWIND_URL) {}

                @for element in head_elements {
                    @match element {
                        HeadElement::ScriptLink(src) => script src=(src) {}
                    }
                }
            }

            body
                hx-ext="response-targets"
                class="min-h-screen bg-gray-50 dark:bg-gray-900"
            {
                (content)

                div id="alert-container" class="alert-container w-full max-w-md px-4" {}
            }
        }
    }
}

/// A full page for errors that stop the dashboard from being shown.
///
/// `status` is shown large above `description`, followed by `fix` and a
/// link back to the dashboard.
pub fn error_view(title: &str, status: &str, description: &str, fix: &str) -> Markup {
    let content = html! {
        main class="flex items-center justify-center min-h-screen px-4"
        {
            div class="max-w-lg p-8 text-center rounded-lg shadow bg-white dark:bg-gray-800"
            {
                p class="mb-2 text-7xl font-extrabold text-blue-600 dark:text-blue-500"
                {
                    (status)
                }

                h1 class="mb-4 text-2xl font-bold text-gray-900 dark:text-white"
                {
                    (description)
                }

                p class="mb-6 text-gray-700 dark:text-gray-300" { (fix) }

                a
                    href="/"
                    class="inline-block px-5 py-2.5 rounded text-sm font-medium
                        text-white bg-blue-600 hover:bg-blue-800"
                {
                    "Back to Dashboard"
                }
            }
        }
    };

    base(title, &[], &content)
}

/// A small spinning ring for buttons, animated by `static/style.css`.
pub fn loading_spinner() -> Markup {
    html! {
        span role="status" aria-hidden="true" class="spinner" {}
    }
}
