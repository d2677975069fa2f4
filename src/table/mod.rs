//! The in-memory table built from an uploaded file.
//!
//! A [Table] is created once per upload and never mutated afterwards. Files
//! are parsed by the [delimited] and [xlsx] readers, which share the header and cell
//! normalisation rules defined here.

mod delimited;
mod ingest;
mod preview;
mod xlsx;

pub use ingest::{FileFormat, parse_upload};
pub use preview::preview_view;

use std::collections::HashSet;

/// Strings that are read as a missing value rather than as text.
const MISSING_MARKERS: [&str; 19] = [
    "", "NA", "N/A", "NaN", "nan", "null", "NULL", "None", "#N/A", "n/a", "<NA>", "-NaN", "-nan",
    "#NA", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN", "#N/A N/A",
];

/// A single value in a table column.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Missing,
}

impl Cell {
    /// Classify text that is known not to be a number, e.g. a spreadsheet
    /// string cell.
    ///
    /// Missing markers become [Cell::Missing], surrounding whitespace
    /// included. Everything else is kept as written.
    pub fn from_text(text: &str) -> Self {
        if MISSING_MARKERS.contains(&text.trim()) {
            Cell::Missing
        } else {
            Cell::Text(text.to_owned())
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// The text used for this cell in chart labels, `None` if missing.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Number(number) => Some(format_number(*number)),
            Cell::Text(text) => Some(text.clone()),
            Cell::Missing => None,
        }
    }
}

/// A value read from a file before the kind of its column is known.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Field {
    /// Text from a delimited file, which becomes a number only if every
    /// other field in its column can too.
    Raw(String),
    /// A value whose type the file records, e.g. a spreadsheet cell.
    Typed(Cell),
}

impl Field {
    pub(crate) fn from_raw(raw: &str) -> Self {
        match Cell::from_text(raw) {
            Cell::Missing => Field::Typed(Cell::Missing),
            _ => Field::Raw(raw.to_owned()),
        }
    }

    fn is_numeric(&self) -> bool {
        match self {
            Field::Raw(raw) => parse_number(raw).is_some(),
            Field::Typed(cell) => matches!(cell, Cell::Number(_) | Cell::Missing),
        }
    }

    fn into_number(self) -> Cell {
        match self {
            Field::Raw(raw) => parse_number(&raw).map_or(Cell::Missing, Cell::Number),
            Field::Typed(cell) => cell,
        }
    }

    fn into_text(self) -> Cell {
        match self {
            Field::Raw(raw) => Cell::Text(raw),
            Field::Typed(Cell::Number(number)) => Cell::Text(format_number(number)),
            Field::Typed(cell) => cell,
        }
    }
}

impl From<Cell> for Field {
    fn from(cell: Cell) -> Self {
        Field::Typed(cell)
    }
}

/// Surrounding whitespace is ignored. NaN is not a number here, it is
/// spelled with a missing marker.
fn parse_number(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|number| !number.is_nan())
}

/// Whether a column holds numbers or text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

/// A named, homogeneous column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    kind: ColumnKind,
    cells: Vec<Cell>,
}

impl Column {
    /// Create a column, settling on a single kind for all of its fields.
    ///
    /// The column is numeric when every present field is a number. Otherwise
    /// raw fields keep their text as written and typed numbers are formatted.
    fn new(name: String, fields: Vec<Field>) -> Self {
        if fields.iter().all(Field::is_numeric) {
            return Self {
                name,
                kind: ColumnKind::Numeric,
                cells: fields.into_iter().map(Field::into_number).collect(),
            };
        }

        Self {
            name,
            kind: ColumnKind::Text,
            cells: fields.into_iter().map(Field::into_text).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The present numeric values, or `None` if the column holds text.
    pub fn numbers(&self) -> Option<Vec<f64>> {
        match self.kind {
            ColumnKind::Numeric => Some(self.cells.iter().filter_map(Cell::as_number).collect()),
            ColumnKind::Text => None,
        }
    }

    /// Format a cell of this column for display.
    ///
    /// Numeric columns whose values are all whole numbers are shown without
    /// a fractional part.
    pub fn display_cell(&self, index: usize) -> String {
        match self.cells.get(index) {
            Some(Cell::Number(number)) => format_number(*number),
            Some(Cell::Text(text)) => text.clone(),
            Some(Cell::Missing) | None => String::new(),
        }
    }
}

/// Format a number without a trailing `.0` for whole values.
pub fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.is_finite() && number.abs() < 1e15 {
        format!("{}", number as i64)
    } else {
        format!("{number}")
    }
}

/// A parsed upload: uniquely named columns of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Build a table from a header row and rows of fields.
    ///
    /// Rows shorter than the header are padded with missing cells. Headers
    /// are normalised with [normalise_headers].
    ///
    /// # Errors
    /// Returns [crate::Error::NoColumns] if the header is empty.
    pub(crate) fn from_rows<F: Into<Field>>(
        headers: Vec<String>,
        rows: Vec<Vec<F>>,
    ) -> Result<Self, crate::Error> {
        if headers.is_empty() {
            return Err(crate::Error::NoColumns);
        }

        let headers = normalise_headers(headers);
        let row_count = rows.len();
        let mut columns: Vec<Vec<Field>> = vec![Vec::with_capacity(row_count); headers.len()];

        for row in rows {
            let mut row = row.into_iter();

            for column in columns.iter_mut() {
                column.push(row.next().map_or(Field::Typed(Cell::Missing), Into::into));
            }
        }

        let columns = headers
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();

        Ok(Self { columns, row_count })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The column names in file order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }
}

/// Make header names usable as unique column names.
///
/// Blank headers become `Unnamed: <position>` and repeated names get a
/// `.1`, `.2`, ... suffix, skipping suffixes that are already taken.
fn normalise_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut normalised = Vec::with_capacity(headers.len());

    for (position, header) in headers.into_iter().enumerate() {
        let header = header.trim().to_owned();
        let base = if header.is_empty() {
            format!("Unnamed: {position}")
        } else {
            header
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while seen.contains(&name) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }

        seen.insert(name.clone());
        normalised.push(name);
    }

    normalised
}

#[cfg(test)]
mod tests {
    use super::{Cell, ColumnKind, Field, Table, normalise_headers};

    fn text(value: &str) -> Cell {
        Cell::Text(value.to_owned())
    }

    fn raw_column(fields: &[&str]) -> Table {
        let rows = fields
            .iter()
            .map(|field| vec![Field::from_raw(field)])
            .collect();

        Table::from_rows(vec!["v".to_owned()], rows).unwrap()
    }

    #[test]
    fn classifies_raw_fields() {
        assert_eq!(Field::from_raw("42"), Field::Raw("42".to_owned()));
        assert_eq!(Field::from_raw(""), Field::Typed(Cell::Missing));
        assert_eq!(Field::from_raw("NA"), Field::Typed(Cell::Missing));
        assert_eq!(Field::from_raw("NaN"), Field::Typed(Cell::Missing));
        assert_eq!(Field::from_raw("  "), Field::Typed(Cell::Missing));
    }

    #[test]
    fn numeric_raw_fields_become_numbers() {
        let table = raw_column(&["42", " 1.5 ", "-3e2", ""]);

        let column = table.column("v").unwrap();
        assert_eq!(column.kind(), ColumnKind::Numeric);
        assert_eq!(
            column.cells(),
            &[
                Cell::Number(42.0),
                Cell::Number(1.5),
                Cell::Number(-300.0),
                Cell::Missing
            ]
        );
    }

    #[test]
    fn text_columns_keep_numbers_as_written() {
        let table = raw_column(&["007", "abc", "1.50", "1e3", "NA"]);

        let column = table.column("v").unwrap();
        assert_eq!(column.kind(), ColumnKind::Text);
        assert_eq!(
            column.cells(),
            &[
                text("007"),
                text("abc"),
                text("1.50"),
                text("1e3"),
                Cell::Missing
            ]
        );
    }

    #[test]
    fn typed_text_is_never_numeric() {
        let table =
            Table::from_rows(vec!["v".to_owned()], vec![vec![Cell::from_text("7")]]).unwrap();

        let column = table.column("v").unwrap();
        assert_eq!(column.kind(), ColumnKind::Text);
        assert_eq!(column.cells(), &[text("7")]);
    }

    #[test]
    fn renames_blank_and_duplicate_headers() {
        let headers = ["a", "", "a", "a.1", "b", "a"]
            .into_iter()
            .map(str::to_owned)
            .collect();

        let got = normalise_headers(headers);

        assert_eq!(got, vec!["a", "Unnamed: 1", "a.1", "a.1.1", "b", "a.2"]);
    }

    #[test]
    fn pads_short_rows_with_missing_cells() {
        let table = Table::from_rows(
            vec!["x".to_owned(), "y".to_owned()],
            vec![vec![Cell::Number(1.0)], vec![Cell::Number(2.0), text("b")]],
        )
        .unwrap();

        assert_eq!(table.row_count(), 2);
        let y = table.column("y").unwrap();
        assert_eq!(y.cells(), &[Cell::Missing, text("b")]);
    }

    #[test]
    fn mixed_columns_become_text() {
        let table = Table::from_rows(
            vec!["mixed".to_owned()],
            vec![vec![Cell::Number(1.0)], vec![text("b")], vec![Cell::Missing]],
        )
        .unwrap();

        let column = table.column("mixed").unwrap();
        assert_eq!(column.kind(), ColumnKind::Text);
        assert_eq!(column.cells(), &[text("1"), text("b"), Cell::Missing]);
        assert_eq!(column.numbers(), None);
    }

    #[test]
    fn numeric_columns_skip_missing_values() {
        let table = Table::from_rows(
            vec!["n".to_owned()],
            vec![
                vec![Cell::Number(1.0)],
                vec![Cell::Missing],
                vec![Cell::Number(2.5)],
            ],
        )
        .unwrap();

        let column = table.column("n").unwrap();
        assert_eq!(column.kind(), ColumnKind::Numeric);
        assert_eq!(column.numbers(), Some(vec![1.0, 2.5]));
        assert_eq!(column.display_cell(0), "1");
        assert_eq!(column.display_cell(1), "");
        assert_eq!(column.display_cell(2), "2.5");
    }

    #[test]
    fn empty_header_is_an_error() {
        let result = Table::from_rows::<Cell>(vec![], vec![]);

        assert_eq!(result, Err(crate::Error::NoColumns));
    }
}
