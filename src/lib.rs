//! explore-charts: configuration and data-binding model for indicator charts.
//!
//! This crate owns the chart configuration (dimensions, chart type, time
//! domain), the query-string round-trip for shareable chart states, and the
//! variable-data binder that reshapes raw time-series payloads into
//! per-entity series. Renderers stay thin: the only rendering surface here is
//! the static SVG export used by the baking pipeline.

pub mod bake;
pub mod config;
pub mod data;
pub mod error;
pub mod render;
pub mod telemetry;
pub mod view;

pub use config::{ChartConfigStore, ChartType, RenderEnvironment};
pub use data::VariableDataBinder;
pub use error::{ChartError, ChartResult};
pub use view::ChartView;
