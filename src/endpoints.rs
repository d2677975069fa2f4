//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The dashboard page with the upload form, preview, pickers and charts.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to upload a CSV or Excel file.
pub const UPLOAD: &str = "/api/upload";
/// The route to store the plot selection and get the matching pickers.
pub const SELECTION: &str = "/api/selection";
/// The route to draw the selected plot.
pub const PLOT: &str = "/api/plot";
