//! The plot picker: kind, axis column and the columns to draw.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, loading_spinner},
    plot::{PlotKind, PlotRequest},
    table::Table,
};

/// Renders the picker form for `table` with `request` selected.
///
/// Changing any field posts the form to the selection endpoint, which swaps
/// in new fields for the chosen kind. The button posts the same form to the
/// plot endpoint and swaps the charts.
pub fn plot_form_view(table: &Table, request: &PlotRequest) -> Markup {
    let spinner = loading_spinner();

    html! {
        form
            id="plot-form"
            hx-post=(endpoints::SELECTION)
            hx-trigger="change"
            hx-target="#plot-fields"
            hx-target-error="#alert-container"
            class="w-full max-w-md space-y-4 mb-6"
        {
            div id="plot-fields" class="space-y-4"
            {
                (plot_fields_view(table, request))
            }

            button
                type="button"
                id="plot-button"
                hx-post=(endpoints::PLOT)
                hx-include="#plot-form"
                hx-target="#charts"
                hx-target-error="#alert-container"
                hx-indicator="#plot-indicator"
                hx-disabled-elt="this"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="plot-indicator" { (spinner) }
                " Generate Plot"
            }
        }
    }
}

/// Renders the fields the chosen kind collects, offering only the columns
/// of `table`.
pub fn plot_fields_view(table: &Table, request: &PlotRequest) -> Markup {
    let kind = request.kind;
    let columns = table.column_names();

    html! {
        div
        {
            label for="kind" class=(FORM_LABEL_STYLE) { "Select Plot Type" }

            select id="kind" name="kind" class=(FORM_TEXT_INPUT_STYLE)
            {
                @for option in PlotKind::ALL {
                    option value=(option.form_value()) selected[option == kind] { (option) }
                }
            }
        }

        @if kind.collects_axis_column() {
            div
            {
                label for="axis_column" class=(FORM_LABEL_STYLE) { "Select X-axis" }

                select id="axis_column" name="axis_column" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for column in &columns {
                        option
                            value=(column)
                            selected[request.axis_column.as_deref() == Some(*column)]
                        {
                            (column)
                        }
                    }
                }
            }
        }

        @if kind.collects_value_columns() {
            (multi_select(
                "value_columns",
                "Select Y-axes",
                &columns,
                &request.value_columns,
            ))
        }

        @if kind.collects_variable_columns() {
            (multi_select(
                "variable_columns",
                "Select Variables for Pie Chart",
                &columns,
                &request.variable_columns,
            ))
        }
    }
}

fn multi_select(name: &str, label: &str, columns: &[&str], selected: &[String]) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select
                id=(name)
                name=(name)
                multiple
                size=(columns.len().clamp(2, 8))
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for column in columns {
                    option
                        value=(column)
                        selected[selected.iter().any(|name| name == column)]
                    {
                        (column)
                    }
                }
            }
        }
    }
}
