//! Chart generation and rendering for the dashboard.
//!
//! Each chart kind is built as an ECharts configuration with `charming` and
//! drawn in the browser by a small initialisation script:
//! - **Bar/Line**: value counts of each selected column on a shared chart
//! - **Scatter**: value columns against the axis column
//! - **Histogram**: 20-bin frequencies of each selected column
//! - **Box**: box plots of each selected column grouped by the axis column
//! - **Pie**: one donut chart of value counts per variable

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisPointer, AxisPointerType, AxisType, Color, ItemStyle, NameLocation, Orient, SplitLine,
        Tooltip, Trigger,
    },
    series::{Bar, Boxplot, Line, Pie, Scatter},
};
use maud::{Markup, PreEscaped, html};

use crate::plot::stats::{BoxSummary, Histogram, ValueCount};

/// Opacity of bars and points, so overlapping series stay visible.
const SERIES_OPACITY: f64 = 0.7;

/// Inner and outer radius of pie charts. The hole is 30% of the outer radius.
const PIE_RADIUS: [&str; 2] = ["21%", "70%"];

/// Colours for pie slices, a red to blue diverging palette.
const RED_BLUE_PALETTE: [&str; 11] = [
    "#67001f", "#b2182b", "#d6604d", "#f4a582", "#fddbc7", "#f7f7f7", "#d1e5f0", "#92c5de",
    "#4393c3", "#2166ac", "#053061",
];

/// A chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: String,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl RenderedChart {
    pub(super) fn new(index: usize, chart: Chart) -> Self {
        Self {
            id: format!("chart-{index}"),
            options: chart.to_string(),
        }
    }
}

/// Renders the chart containers followed by the script that draws them.
pub fn charts_view(charts: &[RenderedChart]) -> Markup {
    html!(
        @if !charts.is_empty() {
            div class="grid grid-cols-1 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[480px] rounded dark:bg-gray-100"
                    {}
                }
            }

            script { (charts_script(charts)) }
        }
    )
}

/// Generates JavaScript initialization code for charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing. The script runs as soon as it is inserted, so it
/// works both on a full page load and after an htmx swap.
fn charts_script(charts: &[RenderedChart]) -> PreEscaped<String> {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                // Column values end up in the options, keep them from closing the script tag.
                chart.options.replace("</", "<\\/")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    PreEscaped(script_content)
}

/// Whether value counts are drawn as bars or as a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum CountStyle {
    Bar,
    Line,
}

/// Value counts of several columns on one chart.
///
/// The category axis holds every label seen in any series, in the order the
/// series list them. A label missing from a series counts zero. The x-axis is
/// named after `axis_name` even though it shows the counted values.
pub(super) fn count_chart(
    style: CountStyle,
    axis_name: Option<&str>,
    series: &[(String, Vec<ValueCount>)],
) -> Chart {
    let mut labels: Vec<String> = Vec::new();
    for (_, counts) in series {
        for count in counts {
            if !labels.contains(&count.label) {
                labels.push(count.label.clone());
            }
        }
    }

    let (title, labels) = match style {
        CountStyle::Bar => ("Bar Chart", labels),
        CountStyle::Line => ("Line Chart", merge_ordered_labels(series)),
    };

    let mut chart = base_chart(format!("{title} of {}", series_names(series)))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .x_axis(
            named_axis(AxisType::Category, axis_name.unwrap_or_default()).data(labels.clone()),
        )
        .y_axis(named_axis(AxisType::Value, "Count"));

    for (name, counts) in series {
        let data: Vec<i64> = labels
            .iter()
            .map(|label| {
                counts
                    .iter()
                    .find(|count| &count.label == label)
                    .map_or(0, |count| count.count as i64)
            })
            .collect();

        chart = match style {
            CountStyle::Bar => chart.series(
                Bar::new()
                    .name(name.as_str())
                    .item_style(ItemStyle::new().opacity(SERIES_OPACITY))
                    .data(data),
            ),
            CountStyle::Line => chart.series(Line::new().name(name.as_str()).data(data)),
        };
    }

    chart
}

/// Merge labels from value-ordered series, keeping the relative order each
/// series gives them.
fn merge_ordered_labels(series: &[(String, Vec<ValueCount>)]) -> Vec<String> {
    let mut all: Vec<&ValueCount> = series.iter().flat_map(|(_, counts)| counts).collect();
    all.sort_by(|a, b| a.cmp_value(b));

    let mut labels: Vec<String> = Vec::with_capacity(all.len());
    for count in all {
        if !labels.contains(&count.label) {
            labels.push(count.label.clone());
        }
    }

    labels
}

/// Points of each value column against the axis column.
///
/// Each series holds `[x, y]` pairs.
pub(super) fn scatter_chart(axis_name: &str, series: &[(String, Vec<Vec<f64>>)]) -> Chart {
    let mut chart = base_chart(format!(
        "Scatter Plot: {} vs {axis_name}",
        series_names(series)
    ))
    .tooltip(Tooltip::new().trigger(Trigger::Item))
    .x_axis(named_axis(AxisType::Value, axis_name).scale(true))
    .y_axis(named_axis(AxisType::Value, "Values").scale(true));

    for (name, points) in series {
        chart = chart.series(
            Scatter::new()
                .name(name.as_str())
                .symbol_size(10)
                .item_style(ItemStyle::new().opacity(SERIES_OPACITY))
                .data(points.clone()),
        );
    }

    chart
}

/// Frequencies of each column over its own bins.
///
/// Bars are placed at bin centres on a shared value axis.
pub(super) fn histogram_chart(series: &[(String, Histogram)]) -> Chart {
    let mut chart = base_chart(format!("Histogram of {}", series_names(series)))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .x_axis(named_axis(AxisType::Value, "Values").scale(true))
        .y_axis(named_axis(AxisType::Value, "Frequency"));

    for (name, histogram) in series {
        let data: Vec<Vec<f64>> = histogram
            .centres()
            .into_iter()
            .zip(&histogram.counts)
            .map(|(centre, &count)| vec![centre, count as f64])
            .collect();

        chart = chart.series(
            Bar::new()
                .name(name.as_str())
                .item_style(ItemStyle::new().opacity(SERIES_OPACITY))
                .data(data),
        );
    }

    chart
}

/// Box plots of each value column over the axis column's categories.
///
/// A category with no values for a series gets an empty box. Outliers are
/// drawn as a scatter series named after the value column.
pub(super) fn box_chart(
    axis_name: &str,
    categories: &[String],
    series: &[(String, Vec<Option<BoxSummary>>)],
) -> Chart {
    let mut chart = base_chart(format!(
        "Box Plot of {} vs {axis_name}",
        series_names(series)
    ))
    .tooltip(Tooltip::new().trigger(Trigger::Item))
    .x_axis(named_axis(AxisType::Category, axis_name).data(categories.to_vec()))
    .y_axis(named_axis(AxisType::Value, "Values").scale(true));

    for (name, summaries) in series {
        let boxes: Vec<Vec<f64>> = summaries
            .iter()
            .map(|summary| summary.as_ref().map(BoxSummary::five_numbers).unwrap_or_default())
            .collect();

        let outliers: Vec<Vec<f64>> = summaries
            .iter()
            .enumerate()
            .flat_map(|(index, summary)| {
                summary
                    .iter()
                    .flat_map(|summary| summary.outliers.iter())
                    .map(move |&value| vec![index as f64, value])
            })
            .collect();

        chart = chart.series(Boxplot::new().name(name.as_str()).data(boxes));

        if !outliers.is_empty() {
            chart = chart.series(
                Scatter::new()
                    .name(name.as_str())
                    .item_style(ItemStyle::new().opacity(SERIES_OPACITY))
                    .data(outliers),
            );
        }
    }

    chart
}

/// A donut chart of the value counts of one variable.
///
/// Hovering a slice shows the variable name, the value and its count. The
/// legend is headed by the variable name.
pub(super) fn pie_chart(variable: &str, counts: &[ValueCount]) -> Chart {
    // The tooltip is rendered as HTML, so the variable name must be escaped.
    let escaped_variable = html!((variable)).into_string();
    let hover_template = format!("{escaped_variable}: {{b}}<br/>Count: {{c}}");

    let data: Vec<(i64, &str)> = counts
        .iter()
        .map(|count| (count.count as i64, count.label.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text(format!("Pie Chart of {variable}"))
                .left("center"),
        )
        .title(Title::new().text(variable).left(10).top(40))
        .color(
            RED_BLUE_PALETTE
                .iter()
                .map(|&colour| Color::from(colour))
                .collect(),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .formatter(hover_template.as_str()),
        )
        .legend(
            Legend::new()
                .orient(Orient::Vertical)
                .left(10)
                .top(70),
        )
        .series(
            Pie::new()
                .name(variable)
                .radius(vec![PIE_RADIUS[0], PIE_RADIUS[1]])
                .center(vec!["55%", "55%"])
                .data(data),
        )
}

/// A chart with the shared title, legend and grid layout.
///
/// The legend is headed "Y-axes", listing one entry per selected column.
fn base_chart(title: String) -> Chart {
    Chart::new()
        .title(Title::new().text(title).left("center"))
        .title(Title::new().text("Y-axes").right(10).top(30))
        .legend(Legend::new().orient(Orient::Vertical).right(10).top(55))
        .grid(
            Grid::new()
                .left("3%")
                .right(140)
                .bottom("8%")
                .top(70)
                .contain_label(true),
        )
}

fn named_axis(type_: AxisType, name: &str) -> Axis {
    Axis::new()
        .type_(type_)
        .name(name)
        .name_location(NameLocation::Middle)
        .name_gap(30)
        .split_line(SplitLine::new().show(true))
}

fn series_names<T>(series: &[(String, T)]) -> String {
    series
        .iter()
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
