//! The dashboard page: file upload, data preview, plot pickers and charts.
//!
//! Every handler reads or updates the shared [Session](crate::session::Session).
//! The page is split into regions that htmx swaps independently:
//! - `#workspace` is replaced after an upload
//! - `#plot-fields` is replaced when the selection changes
//! - `#charts` is replaced when a plot is drawn

mod handlers;
mod views;

pub use handlers::{generate_plot, get_dashboard_page, update_selection, upload_file};
