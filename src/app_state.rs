//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;

use crate::session::Session;

/// The default cap on the size of an uploaded file, in mebibytes.
pub const DEFAULT_MAX_UPLOAD_MB: usize = 200;

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The dashboard session shared by every request.
    pub session: Arc<Mutex<Session>>,

    /// The largest request body accepted by the upload route, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create a new [AppState] with an empty session.
    ///
    /// Uploads larger than `max_upload_mb` mebibytes are rejected.
    pub fn new(max_upload_mb: usize) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::default())),
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_UPLOAD_MB)
    }
}

/// The state needed by the dashboard route handlers.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The dashboard session shared by every request.
    pub session: Arc<Mutex<Session>>,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            session: state.session.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::extract::FromRef;

    use super::{AppState, DashboardState};

    #[test]
    fn converts_upload_limit_to_bytes() {
        let state = AppState::new(2);

        assert_eq!(state.max_upload_bytes, 2 * 1024 * 1024);
    }

    #[test]
    fn dashboard_state_shares_session() {
        let state = AppState::default();

        let dashboard_state = DashboardState::from_ref(&state);

        assert!(Arc::ptr_eq(&state.session, &dashboard_state.session));
    }
}
