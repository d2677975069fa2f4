//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::html;

use crate::{alert::Alert, internal_server_error::InternalServerError};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The multipart form could not be read, or did not hold a file.
    #[error("Could not parse multipart form: {0}")]
    MultipartError(String),

    /// The upload is larger than the configured limit.
    #[error("the upload is larger than the limit")]
    UploadTooLarge,

    /// The uploaded file does not have a `.csv` or `.xlsx` extension.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// The uploaded file has no content.
    #[error("the file \"{0}\" is empty")]
    EmptyUpload(String),

    /// The CSV had issues that prevented it from being parsed.
    #[error("Could not parse the CSV file: {0}")]
    InvalidCSV(String),

    /// The workbook could not be opened or its first sheet could not be read.
    #[error("Could not read the spreadsheet: {0}")]
    InvalidSpreadsheet(String),

    /// The file has no header row, so there are no columns to parse.
    #[error("no columns to parse from file")]
    NoColumns,

    /// A plot request named a column that is not in the loaded table.
    #[error("the column \"{0}\" is not in the table")]
    UnknownColumn(String),

    /// A plot kind that draws the axis column was requested without one.
    ///
    /// Holds the display name of the plot kind.
    #[error("a {0} needs an X-axis column")]
    MissingAxisColumn(String),

    /// A plot kind that needs numbers was given a text column.
    #[error("cannot draw a {plot} of \"{column}\" because it is not numeric")]
    NonNumericColumn {
        /// The offending column.
        column: String,
        /// The display name of the plot kind.
        plot: String,
    },

    /// A selection or plot was requested before a file was uploaded.
    #[error("no file has been uploaded")]
    NoTableLoaded,

    /// Could not acquire the session lock
    #[error("could not acquire the session lock")]
    SessionLockError,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::SessionLockError => InternalServerError {
                description: "Session Unavailable",
                fix: "The dashboard state could not be read. Restart the server and upload your file again.",
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

/// The page region that is emptied along with showing an error alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleRegion {
    /// The preview, pickers and charts of a previous upload.
    Workspace,
    /// The charts of a previous plot.
    Charts,
}

impl StaleRegion {
    fn id(self) -> &'static str {
        match self {
            StaleRegion::Workspace => "workspace",
            StaleRegion::Charts => "charts",
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, alert) = self.into_alert();

        (status_code, alert.into_html()).into_response()
    }

    /// Like [Error::into_alert_response], but also empties `region` with an
    /// out-of-band swap so stale content is not left on the page.
    pub fn into_alert_response_clearing(self, region: StaleRegion) -> Response {
        let (status_code, alert) = self.into_alert();
        let content = html! {
            (alert.into_html())
            div id=(region.id()) hx-swap-oob="innerHTML" {}
        };

        (status_code, content).into_response()
    }

    fn into_alert(self) -> (StatusCode, Alert) {
        match self {
            Error::MultipartError(details) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Could not read upload".to_owned(),
                    details,
                },
            ),
            Error::UploadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Alert::Error {
                    message: "File too large".to_owned(),
                    details: "The file is larger than the server accepts. \
                        Try a smaller file, or restart the server with a higher --max-upload-mb."
                        .to_owned(),
                },
            ),
            Error::UnsupportedFileType(file_name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unsupported file type".to_owned(),
                    details: format!(
                        "\"{file_name}\" is not a CSV or Excel file. \
                        Choose a file ending in .csv or .xlsx."
                    ),
                },
            ),
            Error::EmptyUpload(file_name) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Empty file".to_owned(),
                    details: format!("\"{file_name}\" has no content."),
                },
            ),
            Error::InvalidCSV(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Could not parse the CSV file".to_owned(),
                    details,
                },
            ),
            Error::InvalidSpreadsheet(details) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Could not read the spreadsheet".to_owned(),
                    details,
                },
            ),
            Error::NoColumns => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::ErrorSimple {
                    message: "No columns to parse from file".to_owned(),
                },
            ),
            Error::UnknownColumn(column) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Unknown column".to_owned(),
                    details: format!(
                        "The column \"{column}\" is not in the uploaded file. \
                        Try refreshing the page."
                    ),
                },
            ),
            Error::MissingAxisColumn(plot) => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "Missing X-axis".to_owned(),
                    details: format!("Select an X-axis column to draw a {plot}."),
                },
            ),
            Error::NonNumericColumn { column, plot } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Alert::Error {
                    message: "Could not generate plot".to_owned(),
                    details: format!(
                        "The column \"{column}\" holds text, but a {plot} needs numbers."
                    ),
                },
            ),
            Error::NoTableLoaded => (
                StatusCode::BAD_REQUEST,
                Alert::Error {
                    message: "No file loaded".to_owned(),
                    details: "Upload a CSV or Excel file first.".to_owned(),
                },
            ),
            Error::SessionLockError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details:
                        "An unexpected error occurred, check the server logs for more details."
                            .to_owned(),
                },
            ),
        }
    }
}
