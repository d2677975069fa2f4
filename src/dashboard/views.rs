//! HTML views for the dashboard page and its partials.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    plot::{charts_view, plot_form_view},
    session::Workspace,
    table::{FileFormat, preview_view},
};

const ECHARTS_URL: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The full dashboard page, showing `workspace` when a file is loaded.
pub(super) fn dashboard_view(workspace: Option<&Workspace>) -> Markup {
    let content = html! {
        div class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-3xl font-bold mb-6" { "Dynamic Plotting Dashboard" }

            (upload_form_view())

            div id="workspace" class="w-full flex flex-col items-center"
            {
                @if let Some(workspace) = workspace {
                    (workspace_view(workspace))
                }
            }
        }
    };

    base(
        "Dashboard",
        &[HeadElement::ScriptLink(ECHARTS_URL)],
        &content,
    )
}

fn upload_form_view() -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            hx-post=(endpoints::UPLOAD)
            enctype="multipart/form-data"
            hx-target="#workspace"
            hx-target-error="#alert-container"
            hx-disabled-elt="#file, #upload-button"
            hx-indicator="#upload-indicator"
            class="w-full max-w-md space-y-4 mb-6"
        {
            div
            {
                label for="file" class=(FORM_LABEL_STYLE)
                {
                    "Choose a CSV or Excel file"
                }

                input
                    id="file"
                    type="file"
                    name="file"
                    accept=(FileFormat::ACCEPTED_EXTENSIONS)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button
                type="submit"
                id="upload-button"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="upload-indicator" { (spinner) }
                " Upload"
            }
        }
    }
}

/// The preview, pickers and charts for a loaded file.
pub(super) fn workspace_view(workspace: &Workspace) -> Markup {
    html! {
        (preview_view(workspace.file_name(), workspace.table()))

        (plot_form_view(workspace.table(), workspace.request()))

        div id="charts" class="w-full"
        {
            @if let Some(charts) = workspace.charts() {
                (charts_view(charts))
            }
        }
    }
}
