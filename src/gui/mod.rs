//! GUI module - User interface components

mod app;
mod chart_viewer;
mod control_panel;
mod navigator_panel;

pub use app::SfenViewerApp;
pub use chart_viewer::ChartViewer;
pub use control_panel::{ControlPanel, ControlPanelAction};
pub use navigator_panel::NavigatorPanel;
