//! Decides how an uploaded file is parsed.

use std::path::Path;

use crate::{
    Error,
    table::{Table, delimited::parse_delimited, xlsx::parse_xlsx},
};

/// The file formats that can be uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma separated text, `.csv`.
    Delimited,
    /// An Excel workbook, `.xlsx`.
    Spreadsheet,
}

impl FileFormat {
    /// The file extensions accepted by the upload form.
    pub const ACCEPTED_EXTENSIONS: &'static str = ".csv,.xlsx";

    /// Pick the format from the extension of `file_name`, ignoring case.
    ///
    /// # Errors
    /// Returns [Error::UnsupportedFileType] for any other extension.
    pub fn from_file_name(file_name: &str) -> Result<Self, Error> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(FileFormat::Delimited),
            Some("xlsx") => Ok(FileFormat::Spreadsheet),
            _ => Err(Error::UnsupportedFileType(file_name.to_owned())),
        }
    }
}

/// Parse the contents of an uploaded file into a [Table].
///
/// # Errors
/// Returns an error if the file type is not supported, the file is empty, or
/// the contents cannot be parsed as a table.
pub fn parse_upload(file_name: &str, bytes: Vec<u8>) -> Result<Table, Error> {
    let format = FileFormat::from_file_name(file_name)?;

    if bytes.is_empty() {
        return Err(Error::EmptyUpload(file_name.to_owned()));
    }

    tracing::debug!(
        "Parsing '{file_name}' ({} bytes) as {format:?}",
        bytes.len()
    );

    match format {
        FileFormat::Delimited => {
            let text = String::from_utf8(bytes)
                .map_err(|_| Error::InvalidCSV("the file is not valid UTF-8 text".to_owned()))?;
            parse_delimited(&text)
        }
        FileFormat::Spreadsheet => parse_xlsx(bytes),
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::{FileFormat, parse_upload};

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(
            FileFormat::from_file_name("data.csv"),
            Ok(FileFormat::Delimited)
        );
        assert_eq!(
            FileFormat::from_file_name("DATA.CSV"),
            Ok(FileFormat::Delimited)
        );
        assert_eq!(
            FileFormat::from_file_name("report.final.xlsx"),
            Ok(FileFormat::Spreadsheet)
        );
    }

    #[test]
    fn rejects_other_extensions() {
        assert_eq!(
            FileFormat::from_file_name("notes.txt"),
            Err(Error::UnsupportedFileType("notes.txt".to_owned()))
        );
        assert_eq!(
            FileFormat::from_file_name("no_extension"),
            Err(Error::UnsupportedFileType("no_extension".to_owned()))
        );
    }

    #[test]
    fn rejects_empty_files() {
        assert_eq!(
            parse_upload("empty.csv", Vec::new()),
            Err(Error::EmptyUpload("empty.csv".to_owned()))
        );
    }

    #[test]
    fn rejects_invalid_utf8() {
        let result = parse_upload("bad.csv", vec![0xff, 0xfe, 0x00, 0x41]);

        assert!(
            matches!(result, Err(Error::InvalidCSV(_))),
            "want InvalidCSV error, got {result:?}"
        );
    }

    #[test]
    fn parses_csv_upload() {
        let table = parse_upload("data.csv", b"a,b\n1,x\n".to_vec()).unwrap();

        assert_eq!(table.column_names(), vec!["a", "b"]);
        assert_eq!(table.row_count(), 1);
    }
}
