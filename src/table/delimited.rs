//! Reads comma separated text into a [Table].

use csv::{ReaderBuilder, Trim};

use crate::{
    Error,
    table::{Field, Table},
};

const BYTE_ORDER_MARK: &str = "\u{feff}";

/// Parse CSV text with a header row.
///
/// Rows with fewer fields than the header are padded with missing cells.
///
/// # Errors
/// Returns [Error::NoColumns] if there is no header and [Error::InvalidCSV]
/// if a row has more fields than the header or the text is not valid CSV.
pub(super) fn parse_delimited(text: &str) -> Result<Table, Error> {
    let text = text.strip_prefix(BYTE_ORDER_MARK).unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?
        .iter()
        .map(str::to_owned)
        .collect();

    // An empty file yields a single empty header.
    if headers.iter().all(String::is_empty) && headers.len() <= 1 {
        return Err(Error::NoColumns);
    }

    let mut rows: Vec<Vec<Field>> = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|error| Error::InvalidCSV(error.to_string()))?;

        if record.len() > headers.len() {
            let line = record
                .position()
                .map(|position| position.line())
                .unwrap_or_default();

            return Err(Error::InvalidCSV(format!(
                "expected {} fields on line {line}, saw {}",
                headers.len(),
                record.len()
            )));
        }

        rows.push(record.iter().map(Field::from_raw).collect());
    }

    tracing::debug!(
        "Parsed CSV with {} columns and {} rows",
        headers.len(),
        rows.len()
    );

    Table::from_rows(headers, rows)
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        table::{Cell, ColumnKind},
    };

    use super::parse_delimited;

    #[test]
    fn parses_header_and_rows() {
        let table = parse_delimited("name,count,price\napple,3,1.5\npear,5,2\n").unwrap();

        assert_eq!(table.column_names(), vec!["name", "count", "price"]);
        assert_eq!(table.row_count(), 2);

        let name = table.column("name").unwrap();
        assert_eq!(name.kind(), ColumnKind::Text);
        assert_eq!(name.display_cell(1), "pear");

        let count = table.column("count").unwrap();
        assert_eq!(count.kind(), ColumnKind::Numeric);
        assert_eq!(count.numbers(), Some(vec![3.0, 5.0]));

        let price = table.column("price").unwrap();
        assert_eq!(price.display_cell(0), "1.5");
        assert_eq!(price.display_cell(1), "2");
    }

    #[test]
    fn strips_byte_order_mark() {
        let table = parse_delimited("\u{feff}a,b\n1,2\n").unwrap();

        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn handles_quoted_fields() {
        let table = parse_delimited("a,b\n\"hello, world\",\"1\"\n").unwrap();

        assert_eq!(table.column("a").unwrap().display_cell(0), "hello, world");
        assert_eq!(table.column("b").unwrap().cells(), &[Cell::Number(1.0)]);
    }

    #[test]
    fn pads_short_rows() {
        let table = parse_delimited("a,b,c\n1,2\n").unwrap();

        assert_eq!(table.column("c").unwrap().cells(), &[Cell::Missing]);
    }

    #[test]
    fn rejects_long_rows() {
        let result = parse_delimited("a,b\n1,2,3\n");

        assert!(
            matches!(result, Err(Error::InvalidCSV(_))),
            "want InvalidCSV error, got {result:?}"
        );
    }

    #[test]
    fn rejects_empty_text() {
        assert_eq!(parse_delimited(""), Err(Error::NoColumns));
    }

    #[test]
    fn header_only_gives_empty_table() {
        let table = parse_delimited("a,b\n").unwrap();

        assert_eq!(table.row_count(), 0);
        assert_eq!(table.column_count(), 2);
    }
}
