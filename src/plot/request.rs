//! The user's chart selection.

use std::fmt::Display;

use serde::Deserialize;

use crate::{Error, table::Table};

/// The kinds of chart the dashboard can draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// Counts of each distinct value, one bar series per column.
    #[default]
    Bar,
    /// Counts of each distinct value in value order, one line per column.
    Line,
    /// Value columns plotted against the axis column.
    Scatter,
    /// Frequencies of each column over 20 equal-width bins.
    Histogram,
    /// Box plots of each column grouped by the axis column's categories.
    Box,
    /// One donut chart of value counts per variable column.
    Pie,
}

impl PlotKind {
    /// Every kind, in the order they are offered to the user.
    pub const ALL: [PlotKind; 6] = [
        PlotKind::Bar,
        PlotKind::Line,
        PlotKind::Scatter,
        PlotKind::Histogram,
        PlotKind::Box,
        PlotKind::Pie,
    ];

    /// The value submitted by the plot kind picker.
    pub fn form_value(self) -> &'static str {
        match self {
            PlotKind::Bar => "bar",
            PlotKind::Line => "line",
            PlotKind::Scatter => "scatter",
            PlotKind::Histogram => "histogram",
            PlotKind::Box => "box",
            PlotKind::Pie => "pie",
        }
    }

    /// Whether the axis column picker is shown for this kind.
    pub fn collects_axis_column(self) -> bool {
        self != PlotKind::Pie
    }

    /// Whether drawing this kind reads the axis column.
    ///
    /// The histogram collects an axis column but never draws it.
    pub fn uses_axis_column(self) -> bool {
        !matches!(self, PlotKind::Histogram | PlotKind::Pie)
    }

    pub fn collects_value_columns(self) -> bool {
        self != PlotKind::Pie
    }

    pub fn collects_variable_columns(self) -> bool {
        self == PlotKind::Pie
    }
}

impl Display for PlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PlotKind::Bar => "Bar Chart",
            PlotKind::Line => "Line Chart",
            PlotKind::Scatter => "Scatter Plot",
            PlotKind::Histogram => "Histogram",
            PlotKind::Box => "Box Plot",
            PlotKind::Pie => "Pie Chart",
        };

        write!(f, "{label}")
    }
}

/// The chart selection submitted by the plot form.
///
/// Multi-selects submit one field per selected option, so the column lists
/// must be parsed with a form extractor that supports repeated keys.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlotRequest {
    #[serde(default)]
    pub kind: PlotKind,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub axis_column: Option<String>,
    #[serde(default)]
    pub value_columns: Vec<String>,
    #[serde(default)]
    pub variable_columns: Vec<String>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;

    Ok(value.filter(|value| !value.is_empty()))
}

impl PlotRequest {
    /// The selection shown before the user has picked anything.
    ///
    /// The axis picker starts on the first column, matching the first option
    /// of the dropdown.
    pub fn initial(table: &Table) -> Self {
        Self {
            kind: PlotKind::default(),
            axis_column: table.column_names().first().map(|name| (*name).to_owned()),
            value_columns: Vec::new(),
            variable_columns: Vec::new(),
        }
    }

    /// Drop any selected columns that are not in `table`.
    ///
    /// Form state can outlive the table it was built for, e.g. when a new
    /// file is uploaded in another tab.
    pub fn retain_known_columns(mut self, table: &Table) -> Self {
        self.axis_column = self.axis_column.filter(|name| table.has_column(name));
        self.value_columns.retain(|name| table.has_column(name));
        self.variable_columns.retain(|name| table.has_column(name));
        self
    }

    /// The columns that produce charts for the selected kind.
    pub fn plotted_columns(&self) -> &[String] {
        if self.kind.collects_variable_columns() {
            &self.variable_columns
        } else {
            &self.value_columns
        }
    }

    /// Check that the request can be drawn from `table`.
    ///
    /// # Errors
    /// Returns [Error::UnknownColumn] if any referenced column is not in the
    /// table, or [Error::MissingAxisColumn] if the kind draws the axis
    /// column, there is something to draw and no axis column was chosen.
    pub fn validate(&self, table: &Table) -> Result<(), Error> {
        let referenced = self
            .axis_column
            .iter()
            .chain(&self.value_columns)
            .chain(&self.variable_columns);

        for name in referenced {
            if !table.has_column(name) {
                return Err(Error::UnknownColumn(name.clone()));
            }
        }

        if self.kind.uses_axis_column()
            && self.axis_column.is_none()
            && !self.plotted_columns().is_empty()
        {
            return Err(Error::MissingAxisColumn(self.kind.to_string()));
        }

        Ok(())
    }
}
