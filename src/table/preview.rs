//! The data preview shown after a successful upload.

use std::sync::OnceLock;

use maud::{Markup, html};
use numfmt::{Formatter, Precision};

use crate::{
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE},
    table::Table,
};

/// Renders every row and column of `table` with a caption giving its size.
pub fn preview_view(file_name: &str, table: &Table) -> Markup {
    let rows = table.row_count();
    let columns = table.column_count();
    let formatter = get_thousands_separator_formatter();

    html! {
        section id="preview" class="w-full mb-6"
        {
            h2 class="text-xl font-semibold mb-2" { "Data Preview:" }

            p class="text-sm text-gray-600 dark:text-gray-400 mb-2"
            {
                (file_name) ": "
                (formatter.fmt_string(rows)) (if rows == 1 { " row" } else { " rows" })
                " × "
                (formatter.fmt_string(columns)) (if columns == 1 { " column" } else { " columns" })
            }

            div class="overflow-auto max-h-[32rem] rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class="px-3 py-3" { "" }
                            @for column in table.columns() {
                                th scope="col" class="px-6 py-3" { (column.name()) }
                            }
                        }
                    }

                    tbody
                    {
                        @for row in 0..rows {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                th scope="row" class="px-3 py-4 font-medium text-gray-400" { (row) }
                                @for column in table.columns() {
                                    td class=(TABLE_CELL_STYLE) { (column.display_cell(row)) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn get_thousands_separator_formatter() -> &'static Formatter {
    static FORMATTER: OnceLock<Formatter> = OnceLock::new();

    FORMATTER.get_or_init(|| {
        Formatter::new()
            .separator(',')
            .unwrap()
            .precision(Precision::Decimals(0))
    })
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::table::parse_upload;

    use super::preview_view;

    const CSV: &str = "fruit,count,price\napple,3,1.25\npear,5,\nplum,1200,0.5\n";

    #[test]
    fn shows_every_cell_unchanged() {
        let table = parse_upload("fruit.csv", CSV.as_bytes().to_vec()).unwrap();

        let html = Html::parse_fragment(&preview_view("fruit.csv", &table).into_string());

        let header_selector = Selector::parse("thead th").unwrap();
        let headers: Vec<String> = html
            .select(&header_selector)
            .map(|th| th.text().collect::<String>())
            .collect();
        assert_eq!(headers, vec!["", "fruit", "count", "price"]);

        let row_selector = Selector::parse("tbody tr").unwrap();
        let cell_selector = Selector::parse("td").unwrap();
        let rows: Vec<Vec<String>> = html
            .select(&row_selector)
            .map(|row| {
                row.select(&cell_selector)
                    .map(|td| td.text().collect::<String>())
                    .collect()
            })
            .collect();

        assert_eq!(
            rows,
            vec![
                vec!["apple", "3", "1.25"],
                vec!["pear", "5", ""],
                vec!["plum", "1200", "0.5"],
            ]
        );
    }

    #[test]
    fn text_columns_show_numbers_as_written() {
        let table = parse_upload(
            "codes.csv",
            b"code,n\n007,1\nabc,2\n1.50,3\n1e3,4\n".to_vec(),
        )
        .unwrap();

        let html = Html::parse_fragment(&preview_view("codes.csv", &table).into_string());

        let code_selector = Selector::parse("tbody tr td:nth-of-type(1)").unwrap();
        let codes: Vec<String> = html
            .select(&code_selector)
            .map(|td| td.text().collect::<String>())
            .collect();
        assert_eq!(codes, vec!["007", "abc", "1.50", "1e3"]);
    }

    #[test]
    fn caption_gives_table_size() {
        let table = parse_upload("fruit.csv", CSV.as_bytes().to_vec()).unwrap();

        let html = Html::parse_fragment(&preview_view("fruit.csv", &table).into_string());

        let caption = html
            .select(&Selector::parse("#preview p").unwrap())
            .next()
            .expect("No caption found")
            .text()
            .collect::<String>();
        assert!(
            caption.contains("3 rows × 3 columns"),
            "unexpected caption {caption:?}"
        );
    }
}
