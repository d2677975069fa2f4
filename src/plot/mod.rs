//! Chart selection, the statistics behind each chart kind and the ECharts
//! configurations that draw them.

mod charts;
mod form;
mod render;
mod request;
pub mod stats;

pub use charts::{RenderedChart, charts_view};
pub use form::{plot_fields_view, plot_form_view};
pub use render::render_charts;
pub use request::{PlotKind, PlotRequest};
