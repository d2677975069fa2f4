//! Dashboard HTTP handlers.
//!
//! This module contains the route handlers for:
//! - Displaying the dashboard page in its current state
//! - Uploading a file and showing its preview and pickers
//! - Updating the plot selection
//! - Drawing the selected plot

use std::sync::{Mutex, MutexGuard};

use axum::{
    extract::{
        Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;

use crate::{
    Error,
    app_state::DashboardState,
    dashboard::views::{dashboard_view, workspace_view},
    error::StaleRegion,
    plot::{PlotRequest, charts_view, plot_fields_view},
    session::Session,
    table::parse_upload,
};

/// The name of the multipart field that holds the uploaded file.
const FILE_FIELD: &str = "file";

fn lock_session(session: &Mutex<Session>) -> Result<MutexGuard<'_, Session>, Error> {
    session
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire session lock: {error}"))
        .map_err(|_| Error::SessionLockError)
}

/// Display the dashboard, including the loaded file, selection and charts.
pub async fn get_dashboard_page(State(state): State<DashboardState>) -> Result<Response, Error> {
    let session = lock_session(&state.session)?;

    Ok(dashboard_view(session.workspace()).into_response())
}

/// Replace the loaded table with an uploaded CSV or Excel file.
///
/// The session is emptied before the file is read, so a failed upload leaves
/// nothing loaded. Responds with the preview and pickers for the new table.
pub async fn upload_file(
    State(state): State<DashboardState>,
    mut multipart: Multipart,
) -> Result<Response, Response> {
    lock_session(&state.session)
        .map_err(Error::into_alert_response)?
        .clear();

    let (file_name, bytes) = read_file_field(&mut multipart)
        .await
        .inspect_err(|error| tracing::debug!("Failed to read upload: {error}"))
        .map_err(|error| error.into_alert_response_clearing(StaleRegion::Workspace))?;

    let table = parse_upload(&file_name, bytes)
        .inspect_err(|error| tracing::debug!("Failed to parse '{file_name}': {error}"))
        .map_err(|error| error.into_alert_response_clearing(StaleRegion::Workspace))?;

    tracing::info!(
        "Loaded '{file_name}' with {} rows and {} columns",
        table.row_count(),
        table.column_count()
    );

    let mut session = lock_session(&state.session).map_err(Error::into_alert_response)?;
    let workspace = session.load(file_name, table);

    Ok(workspace_view(workspace).into_response())
}

/// Find the file field in `multipart` and read its name and contents.
async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Vec<u8>), Error> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() == Some(FILE_FIELD) {
            return read_file(field).await;
        }
    }

    Err(Error::MultipartError("no file was uploaded".to_owned()))
}

async fn read_file(field: Field<'_>) -> Result<(String, Vec<u8>), Error> {
    let file_name = match field.file_name() {
        Some(file_name) => file_name.to_owned(),
        None => {
            tracing::error!("Could not get file name from multipart form field: {field:#?}");
            return Err(Error::MultipartError(
                "Could not get file name from multipart form field".to_owned(),
            ));
        }
    };

    let bytes = field
        .bytes()
        .await
        .inspect_err(|error| {
            tracing::error!("Could not read data from multipart form field: {error}")
        })
        .map_err(multipart_error)?;

    Ok((file_name, bytes.to_vec()))
}

fn multipart_error(error: MultipartError) -> Error {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        Error::UploadTooLarge
    } else {
        Error::MultipartError(error.body_text())
    }
}

/// Store the plot selection and respond with the pickers for its plot kind.
pub async fn update_selection(
    State(state): State<DashboardState>,
    Form(request): Form<PlotRequest>,
) -> Result<Response, Response> {
    let mut session = lock_session(&state.session).map_err(Error::into_alert_response)?;

    let workspace = session
        .update_selection(request)
        .inspect_err(|error| tracing::debug!("Could not update selection: {error}"))
        .map_err(Error::into_alert_response)?;

    Ok(plot_fields_view(workspace.table(), workspace.request()).into_response())
}

/// Draw the selected plot and respond with the charts.
///
/// On failure the charts region is emptied and an alert explains why.
pub async fn generate_plot(
    State(state): State<DashboardState>,
    Form(request): Form<PlotRequest>,
) -> Result<Response, Response> {
    let mut session = lock_session(&state.session).map_err(Error::into_alert_response)?;

    let charts = session
        .plot(request)
        .inspect_err(|error| tracing::debug!("Could not generate plot: {error}"))
        .map_err(|error| error.into_alert_response_clearing(StaleRegion::Charts))?;

    Ok(charts_view(charts).into_response())
}
