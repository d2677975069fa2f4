//! Alert messages shown to the user in the page's alert container.
//!
//! Alerts are returned by handlers that fail, and htmx swaps them into
//! `#alert-container` via the `hx-target-error` attribute.

use maud::{Markup, html};

/// An alert message with optional details.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// An error with a headline and an explanation.
    Error { message: String, details: String },
    /// An error that is explained by its headline alone.
    ErrorSimple { message: String },
}

impl Alert {
    /// Render the alert, including a button that dismisses it.
    pub fn into_html(self) -> Markup {
        let (message, details) = match self {
            Alert::Error { message, details } => (message, Some(details)),
            Alert::ErrorSimple { message } => (message, None),
        };

        html! {
            div
                role="alert"
                class="flex items-start gap-3 p-4 mb-4 rounded-lg shadow-lg border
                    text-red-800 bg-red-50 border-red-300
                    dark:bg-gray-800 dark:text-red-400 dark:border-red-800"
            {
                div class="flex-1"
                {
                    p class="text-sm font-medium" { (message) }

                    @if let Some(details) = details {
                        p class="mt-1 text-sm opacity-80" { (details) }
                    }
                }

                button
                    type="button"
                    aria-label="Dismiss"
                    onclick="this.closest('[role=alert]').remove()"
                    class="text-lg leading-none opacity-70 hover:opacity-100"
                {
                    "×"
                }
            }
        }
    }
}
