//! Drawing Surfaces
//! Named rendering targets that hold one chart instance each, and the entry
//! point that binds evaluation data to a surface by name.

use crate::charts::series::{ChartStyle, CpSeries, CP_CHART_STYLE};
use crate::data::EvalData;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

/// Surface name the viewer registers for its interactive chart.
pub const INTERACTIVE_SURFACE: &str = "cp-chart";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Drawing surface '{0}' does not exist")]
    SurfaceNotFound(String),
    #[error("Chart drawing failed: {0}")]
    Drawing(String),
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A rendering target. Drawing replaces whatever chart the surface held.
pub trait ChartSurface {
    fn draw(&mut self, series: &CpSeries, style: &ChartStyle) -> Result<(), RenderError>;
}

#[derive(Debug, Default)]
struct PlotState {
    series: Option<CpSeries>,
    generation: u64,
}

/// In-memory surface read by the egui chart viewer each frame.
///
/// Clones share one chart instance: the registry draws through one handle
/// and the viewer reads through another.
#[derive(Debug, Default, Clone)]
pub struct PlotSurface {
    state: Rc<RefCell<PlotState>>,
}

impl PlotSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_series<R>(&self, f: impl FnOnce(Option<&CpSeries>) -> R) -> R {
        f(self.state.borrow().series.as_ref())
    }

    /// Bumped on every draw so the plot can reset its bounds.
    pub fn generation(&self) -> u64 {
        self.state.borrow().generation
    }

    pub fn clear(&self) {
        let mut state = self.state.borrow_mut();
        state.series = None;
        state.generation += 1;
    }
}

impl ChartSurface for PlotSurface {
    fn draw(&mut self, series: &CpSeries, _style: &ChartStyle) -> Result<(), RenderError> {
        let mut state = self.state.borrow_mut();
        state.series = Some(series.clone());
        state.generation += 1;
        Ok(())
    }
}

/// Surfaces addressed by name.
#[derive(Default)]
pub struct SurfaceRegistry {
    surfaces: HashMap<String, Box<dyn ChartSurface>>,
}

impl SurfaceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a surface, returning the one it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        surface: Box<dyn ChartSurface>,
    ) -> Option<Box<dyn ChartSurface>> {
        self.surfaces.insert(name.into(), surface)
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn ChartSurface>> {
        self.surfaces.remove(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn ChartSurface + 'static)> {
        self.surfaces.get_mut(name).map(|s| s.as_mut())
    }
}

/// Clamp the evaluations and draw them onto the named surface.
pub fn render_cp_chart(
    data: &EvalData,
    surface_id: &str,
    registry: &mut SurfaceRegistry,
) -> Result<(), RenderError> {
    let surface = registry
        .get_mut(surface_id)
        .ok_or_else(|| RenderError::SurfaceNotFound(surface_id.to_string()))?;

    let series = CpSeries::from_eval_data(data);
    debug!(surface = surface_id, points = series.len(), "rendering cp chart");
    surface.draw(&series, &CP_CHART_STYLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::EvalNode;
    use std::sync::{Arc, Mutex};

    /// Records every series drawn on it.
    struct RecordingSurface(Arc<Mutex<Vec<CpSeries>>>);

    impl ChartSurface for RecordingSurface {
        fn draw(&mut self, series: &CpSeries, style: &ChartStyle) -> Result<(), RenderError> {
            assert_eq!(style.dataset_label, "Centipawn Evaluation");
            self.0.lock().unwrap().push(series.clone());
            Ok(())
        }
    }

    fn data(cps: &[i64]) -> EvalData {
        EvalData {
            nodes: cps
                .iter()
                .enumerate()
                .map(|(i, &cp)| EvalNode {
                    index: i as i64,
                    cp: Some(cp),
                })
                .collect(),
        }
    }

    #[test]
    fn missing_surface_is_an_error() {
        let mut registry = SurfaceRegistry::new();
        let err = render_cp_chart(&data(&[1]), "nowhere", &mut registry).unwrap_err();
        assert!(matches!(err, RenderError::SurfaceNotFound(name) if name == "nowhere"));
    }

    #[test]
    fn draws_clamped_series_on_named_surface() {
        let drawn = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SurfaceRegistry::new();
        registry.register("main", Box::new(RecordingSurface(drawn.clone())));
        registry.register("other", Box::new(RecordingSurface(Arc::default())));

        render_cp_chart(&data(&[5000, -9999, 120]), "main", &mut registry).unwrap();

        let drawn = drawn.lock().unwrap();
        assert_eq!(drawn.len(), 1);
        assert_eq!(drawn[0].values, vec![Some(3300), Some(-3300), Some(120)]);
        assert_eq!(drawn[0].labels, vec![0, 1, 2]);
    }

    #[test]
    fn plot_surface_replaces_previous_chart() {
        let viewer = PlotSurface::new();
        let mut registry = SurfaceRegistry::new();
        registry.register(INTERACTIVE_SURFACE, Box::new(viewer.clone()));

        render_cp_chart(&data(&[1, 2]), INTERACTIVE_SURFACE, &mut registry).unwrap();
        render_cp_chart(&data(&[9000]), INTERACTIVE_SURFACE, &mut registry).unwrap();

        viewer.with_series(|s| assert_eq!(s.unwrap().values, vec![Some(3300)]));
        assert_eq!(viewer.generation(), 2);
        viewer.clear();
        assert!(viewer.with_series(|s| s.is_none()));
    }

    #[test]
    fn empty_data_still_draws() {
        let drawn = Arc::new(Mutex::new(Vec::new()));
        let mut registry = SurfaceRegistry::new();
        registry.register(INTERACTIVE_SURFACE, Box::new(RecordingSurface(drawn.clone())));
        render_cp_chart(&EvalData::default(), INTERACTIVE_SURFACE, &mut registry).unwrap();
        assert!(drawn.lock().unwrap()[0].is_empty());
    }
}
