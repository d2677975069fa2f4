//! The dashboard's state between requests.
//!
//! A session moves through three phases:
//! - **Empty**: no file has been uploaded, or the last upload failed.
//! - **Loaded**: a table is held along with the current plot selection.
//! - **Rendered**: as loaded, plus the charts from the last plot request.

use crate::{
    Error,
    plot::{PlotRequest, RenderedChart, render_charts},
    table::Table,
};

/// The phase a [Session] is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Empty,
    Loaded,
    Rendered,
}

/// An uploaded table with the user's selection and charts.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    file_name: String,
    table: Table,
    request: PlotRequest,
    charts: Option<Vec<RenderedChart>>,
}

impl Workspace {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn request(&self) -> &PlotRequest {
        &self.request
    }

    /// The charts from the last successful plot request, if any.
    pub fn charts(&self) -> Option<&[RenderedChart]> {
        self.charts.as_deref()
    }
}

/// The single user's dashboard state.
#[derive(Debug, Default)]
pub struct Session {
    workspace: Option<Workspace>,
}

impl Session {
    pub fn phase(&self) -> Phase {
        match &self.workspace {
            None => Phase::Empty,
            Some(Workspace { charts: None, .. }) => Phase::Loaded,
            Some(Workspace {
                charts: Some(_), ..
            }) => Phase::Rendered,
        }
    }

    /// The loaded workspace, or `None` while empty.
    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    /// Discard the table, selection and charts.
    pub fn clear(&mut self) {
        self.workspace = None;
    }

    /// Hold a newly uploaded table with the initial selection.
    pub fn load(&mut self, file_name: String, table: Table) -> &Workspace {
        let request = PlotRequest::initial(&table);

        self.workspace.insert(Workspace {
            file_name,
            table,
            request,
            charts: None,
        })
    }

    /// Store a new selection, dropping columns that are not in the table.
    ///
    /// Charts from an earlier plot request are kept until the next one.
    ///
    /// # Errors
    /// Returns [Error::NoTableLoaded] if the session is empty.
    pub fn update_selection(&mut self, request: PlotRequest) -> Result<&Workspace, Error> {
        let workspace = self.workspace.as_mut().ok_or(Error::NoTableLoaded)?;
        workspace.request = request.retain_known_columns(&workspace.table);

        Ok(&*workspace)
    }

    /// Store `request` and draw its charts.
    ///
    /// # Errors
    /// Returns [Error::NoTableLoaded] if the session is empty, or the error
    /// from drawing the charts. On a drawing error any previous charts are
    /// discarded and the session is left loaded.
    pub fn plot(&mut self, request: PlotRequest) -> Result<&[RenderedChart], Error> {
        let workspace = self.workspace.as_mut().ok_or(Error::NoTableLoaded)?;
        workspace.charts = None;

        let charts = render_charts(&workspace.table, &request)?;
        workspace.request = request;
        let charts: &[RenderedChart] = workspace.charts.insert(charts);

        Ok(charts)
    }
}
