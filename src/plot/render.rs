//! Turns a plot request into charts.

use crate::{
    Error,
    plot::{
        PlotKind, PlotRequest,
        charts::{
            CountStyle, RenderedChart, box_chart, count_chart, histogram_chart, pie_chart,
            scatter_chart,
        },
        stats::{
            HISTOGRAM_BINS, box_summary, categories, group_by_category, histogram,
            sorted_value_counts, value_counts,
        },
    },
    table::{Cell, Column, Table},
};

/// Draw the charts for `request` from `table`.
///
/// Bar, line, scatter, histogram and box plots produce a single chart with a
/// series per value column. Pie charts produce one chart per variable column.
/// Nothing is drawn when no columns are selected, or when no selected
/// histogram column holds a number.
///
/// # Errors
/// Returns an error if the request does not match the table, see
/// [PlotRequest::validate], or if a kind that needs numbers is given a text
/// column. No charts are returned when any column fails.
pub fn render_charts(table: &Table, request: &PlotRequest) -> Result<Vec<RenderedChart>, Error> {
    request.validate(table)?;

    let names = request.plotted_columns();
    if names.is_empty() {
        return Ok(Vec::new());
    }

    let columns = names
        .iter()
        .map(|name| lookup(table, name))
        .collect::<Result<Vec<_>, _>>()?;
    // Only `None` for kinds that never read it.
    let axis = request
        .axis_column
        .as_deref()
        .map(|name| lookup(table, name))
        .transpose()?;

    let charts = match request.kind {
        PlotKind::Bar => vec![count_chart(
            CountStyle::Bar,
            request.axis_column.as_deref(),
            &labelled(&columns, value_counts),
        )],
        PlotKind::Line => vec![count_chart(
            CountStyle::Line,
            request.axis_column.as_deref(),
            &labelled(&columns, sorted_value_counts),
        )],
        PlotKind::Scatter => {
            let axis = required_axis(axis, request.kind)?;
            let x_values = numeric_cells(axis, request.kind)?;
            let series = columns
                .iter()
                .map(|column| {
                    let y_values = numeric_cells(column, request.kind)?;
                    let points = x_values
                        .iter()
                        .zip(y_values)
                        .filter_map(|(x, y)| Some(vec![(*x)?, y?]))
                        .collect();
                    Ok((column.name().to_owned(), points))
                })
                .collect::<Result<Vec<_>, Error>>()?;

            vec![scatter_chart(axis.name(), &series)]
        }
        PlotKind::Histogram => {
            let series = columns
                .iter()
                .map(|column| {
                    let values = numbers(column, request.kind)?;
                    Ok(histogram(&values, HISTOGRAM_BINS)
                        .map(|histogram| (column.name().to_owned(), histogram)))
                })
                .collect::<Result<Vec<_>, Error>>()?
                .into_iter()
                .flatten()
                .collect::<Vec<_>>();

            // Columns with no numbers have no bins to draw.
            if series.is_empty() {
                Vec::new()
            } else {
                vec![histogram_chart(&series)]
            }
        }
        PlotKind::Box => {
            let axis = required_axis(axis, request.kind)?;
            let categories = categories(axis);
            let series = columns
                .iter()
                .map(|column| {
                    numbers(column, request.kind)?;
                    let summaries = group_by_category(axis, column)
                        .into_iter()
                        .map(|(_, values)| box_summary(&values))
                        .collect();
                    Ok((column.name().to_owned(), summaries))
                })
                .collect::<Result<Vec<_>, Error>>()?;

            vec![box_chart(axis.name(), &categories, &series)]
        }
        PlotKind::Pie => columns
            .iter()
            .map(|column| pie_chart(column.name(), &value_counts(column)))
            .collect(),
    };

    tracing::debug!(
        "Rendered {} chart(s) of kind {} for columns {:?}",
        charts.len(),
        request.kind,
        names
    );

    Ok(charts
        .into_iter()
        .enumerate()
        .map(|(index, chart)| RenderedChart::new(index, chart))
        .collect())
}

fn lookup<'a>(table: &'a Table, name: &str) -> Result<&'a Column, Error> {
    table
        .column(name)
        .ok_or_else(|| Error::UnknownColumn(name.to_owned()))
}

fn required_axis(axis: Option<&Column>, kind: PlotKind) -> Result<&Column, Error> {
    axis.ok_or_else(|| Error::MissingAxisColumn(kind.to_string()))
}

fn labelled<T>(columns: &[&Column], stat: impl Fn(&Column) -> T) -> Vec<(String, T)> {
    columns
        .iter()
        .map(|column| (column.name().to_owned(), stat(column)))
        .collect()
}

/// The present values of a numeric column.
fn numbers(column: &Column, kind: PlotKind) -> Result<Vec<f64>, Error> {
    column
        .numbers()
        .ok_or_else(|| non_numeric(column, kind))
}

/// Every cell of a numeric column, keeping row positions.
fn numeric_cells(column: &Column, kind: PlotKind) -> Result<Vec<Option<f64>>, Error> {
    column.numbers().ok_or_else(|| non_numeric(column, kind))?;

    Ok(column.cells().iter().map(Cell::as_number).collect())
}

fn non_numeric(column: &Column, kind: PlotKind) -> Error {
    Error::NonNumericColumn {
        column: column.name().to_owned(),
        plot: kind.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use crate::{
        Error,
        plot::{PlotKind, PlotRequest, RenderedChart},
        table::{Table, parse_upload},
    };

    use super::render_charts;

    const CSV: &str = "\
category,a,b,score
x,1,4,10
y,1,5,20
x,2,5,30
";

    fn table() -> Table {
        parse_upload("data.csv", CSV.as_bytes().to_vec()).unwrap()
    }

    fn request(kind: PlotKind, axis: Option<&str>, columns: &[&str]) -> PlotRequest {
        let columns: Vec<String> = columns.iter().map(|name| (*name).to_owned()).collect();

        PlotRequest {
            kind,
            axis_column: axis.map(str::to_owned),
            value_columns: if kind == PlotKind::Pie {
                vec![]
            } else {
                columns.clone()
            },
            variable_columns: if kind == PlotKind::Pie {
                columns
            } else {
                vec![]
            },
        }
    }

    fn options(chart: &RenderedChart) -> Value {
        serde_json::from_str(&chart.options).expect("chart options should be valid JSON")
    }

    /// Components such as axes may be serialised as an object or a list.
    fn first(value: &Value) -> &Value {
        match value {
            Value::Array(items) => &items[0],
            other => other,
        }
    }

    fn titles(options: &Value) -> Vec<String> {
        match &options["title"] {
            Value::Array(items) => items
                .iter()
                .map(|title| title["text"].as_str().unwrap().to_owned())
                .collect(),
            title => vec![title["text"].as_str().unwrap().to_owned()],
        }
    }

    fn series_data(options: &Value, index: usize) -> &Value {
        &options["series"][index]["data"]
    }

    #[test]
    fn bar_chart_counts_each_value() {
        let charts = render_charts(
            &table(),
            &request(PlotKind::Bar, Some("category"), &["a", "b"]),
        )
        .unwrap();

        assert_eq!(charts.len(), 1);
        let options = options(&charts[0]);
        assert_eq!(titles(&options)[0], "Bar Chart of a, b");

        let x_axis = first(&options["xAxis"]);
        assert_eq!(x_axis["name"], "category");
        assert_eq!(x_axis["data"], serde_json::json!(["1", "2", "5", "4"]));
        assert_eq!(first(&options["yAxis"])["name"], "Count");

        assert_eq!(options["series"][0]["name"], "a");
        assert_eq!(series_data(&options, 0), &serde_json::json!([2, 1, 0, 0]));
        assert_eq!(options["series"][1]["name"], "b");
        assert_eq!(series_data(&options, 1), &serde_json::json!([0, 0, 2, 1]));
    }

    #[test]
    fn bar_chart_from_small_file() {
        let table = parse_upload("t.csv", b"a,b\nx,1\ny,2\nx,3\n".to_vec()).unwrap();

        let charts = render_charts(&table, &request(PlotKind::Bar, Some("a"), &["a"])).unwrap();

        let options = options(&charts[0]);
        assert_eq!(first(&options["xAxis"])["data"], serde_json::json!(["x", "y"]));
        assert_eq!(series_data(&options, 0), &serde_json::json!([2, 1]));
    }

    #[test]
    fn line_chart_orders_labels_by_value() {
        let table = parse_upload("t.csv", b"n\n10\n2\n2\n30\n".to_vec()).unwrap();

        let charts = render_charts(&table, &request(PlotKind::Line, Some("n"), &["n"])).unwrap();

        let options = options(&charts[0]);
        assert_eq!(titles(&options)[0], "Line Chart of n");
        assert_eq!(
            first(&options["xAxis"])["data"],
            serde_json::json!(["2", "10", "30"])
        );
        assert_eq!(series_data(&options, 0), &serde_json::json!([2, 1, 1]));
    }

    #[test]
    fn scatter_plots_values_against_axis() {
        let charts = render_charts(
            &table(),
            &request(PlotKind::Scatter, Some("a"), &["score"]),
        )
        .unwrap();

        let options = options(&charts[0]);
        assert_eq!(titles(&options)[0], "Scatter Plot: score vs a");
        assert_eq!(first(&options["xAxis"])["name"], "a");
        assert_eq!(first(&options["yAxis"])["name"], "Values");
        assert_eq!(
            series_data(&options, 0),
            &serde_json::json!([[1.0, 10.0], [1.0, 20.0], [2.0, 30.0]])
        );
    }

    #[test]
    fn scatter_rejects_text_columns() {
        let got = render_charts(
            &table(),
            &request(PlotKind::Scatter, Some("category"), &["score"]),
        );

        assert_eq!(
            got,
            Err(Error::NonNumericColumn {
                column: "category".to_owned(),
                plot: "Scatter Plot".to_owned()
            })
        );
    }

    #[test]
    fn histogram_bins_each_column() {
        let charts = render_charts(
            &table(),
            &request(PlotKind::Histogram, None, &["score", "b"]),
        )
        .unwrap();

        let options = options(&charts[0]);
        assert_eq!(titles(&options)[0], "Histogram of score, b");
        assert_eq!(first(&options["xAxis"])["name"], "Values");
        assert_eq!(first(&options["yAxis"])["name"], "Frequency");

        for index in 0..2 {
            let bins = series_data(&options, index).as_array().unwrap();
            assert_eq!(bins.len(), 20);
            let total: f64 = bins.iter().map(|bin| bin[1].as_f64().unwrap()).sum();
            assert_eq!(total, 3.0);
        }
    }

    #[test]
    fn histogram_of_empty_columns_draws_nothing() {
        let table = parse_upload("gaps.csv", b"a,b\n1,\n2,NA\n".to_vec()).unwrap();

        let charts = render_charts(&table, &request(PlotKind::Histogram, Some("a"), &["b"]))
            .unwrap();

        assert!(charts.is_empty());
    }

    #[test]
    fn histogram_rejects_text_columns() {
        let got = render_charts(
            &table(),
            &request(PlotKind::Histogram, None, &["score", "category"]),
        );

        assert!(matches!(got, Err(Error::NonNumericColumn { .. })));
    }

    #[test]
    fn box_plot_groups_by_axis_categories() {
        let charts = render_charts(
            &table(),
            &request(PlotKind::Box, Some("category"), &["score"]),
        )
        .unwrap();

        let options = options(&charts[0]);
        assert_eq!(titles(&options)[0], "Box Plot of score vs category");
        assert_eq!(first(&options["xAxis"])["data"], serde_json::json!(["x", "y"]));
        assert_eq!(
            series_data(&options, 0),
            &serde_json::json!([
                [10.0, 15.0, 20.0, 25.0, 30.0],
                [20.0, 20.0, 20.0, 20.0, 20.0]
            ])
        );
    }

    #[test]
    fn pie_chart_per_variable() {
        let charts = render_charts(&table(), &request(PlotKind::Pie, None, &["category", "a"]))
            .unwrap();

        assert_eq!(charts.len(), 2);
        assert_ne!(charts[0].id, charts[1].id);

        let options = options(&charts[0]);
        let titles = titles(&options);
        assert_eq!(titles[0], "Pie Chart of category");
        assert!(titles.contains(&"category".to_owned()));

        let pie = &options["series"][0];
        assert_eq!(pie["radius"], serde_json::json!(["21%", "70%"]));
        let total: i64 = pie["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|slice| slice["value"].as_i64().unwrap())
            .sum();
        assert_eq!(total, 3);
        assert_eq!(pie["data"][0]["name"], "x");
        assert_eq!(pie["data"][0]["value"], 2);

        let tooltip = first(&options["tooltip"]);
        assert_eq!(tooltip["formatter"], "category: {b}<br/>Count: {c}");
    }

    #[test]
    fn pie_tooltip_escapes_variable_name() {
        let table = parse_upload("t.csv", b"<b>\n1\n".to_vec()).unwrap();

        let charts = render_charts(&table, &request(PlotKind::Pie, None, &["<b>"])).unwrap();

        let options = options(&charts[0]);
        assert_eq!(
            first(&options["tooltip"])["formatter"],
            "&lt;b&gt;: {b}<br/>Count: {c}"
        );
    }

    #[test]
    fn no_columns_draws_nothing() {
        for kind in PlotKind::ALL {
            let charts = render_charts(&table(), &request(kind, Some("a"), &[])).unwrap();
            assert!(charts.is_empty(), "{kind} drew charts with no columns");
        }
    }

    #[test]
    fn unknown_column_is_an_error() {
        let got = render_charts(&table(), &request(PlotKind::Bar, Some("a"), &["nope"]));

        assert_eq!(got, Err(Error::UnknownColumn("nope".to_owned())));
    }
}
