//! Charts module - Chart rendering

mod plotter;
mod renderer;
mod series;
mod surface;

pub use plotter::ChartPlotter;
pub use renderer::{BitmapSurface, StaticChartRenderer, DEFAULT_HEIGHT, DEFAULT_WIDTH};
pub use series::{clamp_cp, smooth_polyline, ChartStyle, CpSeries, CP_CAP, CP_CHART_STYLE};
pub use surface::{
    render_cp_chart, ChartSurface, PlotSurface, RenderError, SurfaceRegistry, INTERACTIVE_SURFACE,
};
