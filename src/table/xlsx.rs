//! Reads the first worksheet of an Excel workbook into a [Table].

use std::io::Cursor;

use calamine::{Data, DataType, Reader, Xlsx};

use crate::{
    Error,
    table::{Cell, Table, format_number},
};

/// Parse the first worksheet of an `.xlsx` workbook.
///
/// The first row of the sheet is used as the header.
///
/// # Errors
/// Returns [Error::InvalidSpreadsheet] if the bytes are not a readable
/// workbook or the workbook has no sheets, and [Error::NoColumns] if the
/// first sheet is empty.
pub(super) fn parse_xlsx(bytes: Vec<u8>) -> Result<Table, Error> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|error| Error::InvalidSpreadsheet(error.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::InvalidSpreadsheet("the workbook has no sheets".to_owned()))?
        .map_err(|error| Error::InvalidSpreadsheet(error.to_string()))?;

    let mut rows = range.rows();

    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(header_text).collect(),
        None => return Err(Error::NoColumns),
    };

    let rows: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(to_cell).collect())
        .collect();

    tracing::debug!(
        "Parsed spreadsheet with {} columns and {} rows",
        headers.len(),
        rows.len()
    );

    Table::from_rows(headers, rows)
}

fn header_text(data: &Data) -> String {
    match to_cell(data) {
        Cell::Number(number) => format_number(number),
        Cell::Text(text) => text,
        Cell::Missing => String::new(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(number) => Cell::Number(*number as f64),
        Data::Float(number) if number.is_nan() => Cell::Missing,
        Data::Float(number) => Cell::Number(*number),
        Data::String(text) => Cell::from_text(text),
        Data::Bool(true) => Cell::Text("True".to_owned()),
        Data::Bool(false) => Cell::Text("False".to_owned()),
        Data::DateTime(excel_date) => match data.as_datetime() {
            Some(date_time) => {
                let text = date_time.to_string();
                Cell::Text(text.trim_end_matches(" 00:00:00").to_owned())
            }
            None => Cell::Number(excel_date.as_f64()),
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => Cell::Text(text.clone()),
        // Empty and error cells.
        _ => Cell::Missing,
    }
}
