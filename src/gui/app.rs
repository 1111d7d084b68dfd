//! SFEN Viewer Main Application
//! Main window with control panel, chart viewer and tree navigator.

use crate::charts::{
    render_cp_chart, BitmapSurface, CpSeries, PlotSurface, SurfaceRegistry, DEFAULT_HEIGHT,
    DEFAULT_WIDTH, INTERACTIVE_SURFACE,
};
use crate::data::{AnalysisDocument, DataLoader};
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction, NavigatorPanel};
use crate::navigator::{NavigatorAction, NavigatorState, NodeLookup};
use crate::stats::StatsCalculator;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use tracing::{debug, error, info, warn};

/// Temporary surface name used while exporting.
const EXPORT_SURFACE: &str = "cp-chart-export";

/// Loading result from background thread
enum LoadResult {
    Progress(String),
    Complete(Box<AnalysisDocument>),
    Error(String),
}

/// Main application window.
pub struct SfenViewerApp {
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
    navigator_panel: NavigatorPanel,
    surfaces: SurfaceRegistry,

    document: Option<AnalysisDocument>,
    navigator: Option<NavigatorState>,
    lookup: NodeLookup,

    // Async loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl SfenViewerApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        lookup: NodeLookup,
        initial_file: Option<PathBuf>,
    ) -> Self {
        let plot = PlotSurface::new();
        let mut surfaces = SurfaceRegistry::new();
        surfaces.register(INTERACTIVE_SURFACE, Box::new(plot.clone()));

        let mut app = Self {
            control_panel: ControlPanel::new(lookup),
            chart_viewer: ChartViewer::new(plot),
            navigator_panel: NavigatorPanel::new(),
            surfaces,
            document: None,
            navigator: None,
            lookup,
            load_rx: None,
            is_loading: false,
        };

        if let Some(path) = initial_file {
            app.start_load(path);
        }
        app
    }

    fn handle_browse_json(&mut self) {
        if self.is_loading {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Analysis JSON", &["json"])
            .pick_file()
        {
            self.start_load(path);
        }
    }

    /// Read the document on a background thread.
    fn start_load(&mut self, path: PathBuf) {
        self.chart_viewer.clear();
        self.document = None;
        self.navigator = None;
        self.control_panel.export_enabled = false;
        self.control_panel.json_path = Some(path.clone());
        self.control_panel.set_progress(10.0, "Loading analysis file...");
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress(format!(
                "Reading {}...",
                path.display()
            )));

            match DataLoader::load_json(&path) {
                Ok(doc) => {
                    let _ = tx.send(LoadResult::Complete(Box::new(doc)));
                }
                Err(e) => {
                    let _ = tx.send(LoadResult::Error(e.to_string()));
                }
            }
        });
    }

    /// Check for loading results
    fn check_load_results(&mut self) {
        let rx = self.load_rx.take();
        if let Some(rx) = rx {
            let mut should_keep_receiver = true;

            while let Ok(result) = rx.try_recv() {
                match result {
                    LoadResult::Progress(status) => {
                        self.control_panel.set_progress(30.0, &status);
                    }
                    LoadResult::Complete(doc) => {
                        self.install_document(*doc);
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                    LoadResult::Error(e) => {
                        error!("load failed: {}", e);
                        self.control_panel
                            .set_progress(0.0, &format!("Error: {}", e));
                        self.is_loading = false;
                        should_keep_receiver = false;
                    }
                }
            }

            if should_keep_receiver {
                self.load_rx = Some(rx);
            }
        }
    }

    fn install_document(&mut self, doc: AnalysisDocument) {
        if let Err(e) = render_cp_chart(&doc.evals, INTERACTIVE_SURFACE, &mut self.surfaces) {
            error!("chart render failed: {}", e);
            self.control_panel
                .set_progress(0.0, &format!("Error: {}", e));
            return;
        }

        let series = CpSeries::from_eval_data(&doc.evals);
        self.chart_viewer
            .set_summary(StatsCalculator::summarize(&series));

        self.navigator = doc
            .tree
            .as_ref()
            .and_then(|tree| match NavigatorState::new(tree, self.lookup) {
                Ok(state) => Some(state),
                Err(e) => {
                    warn!("navigator disabled: {}", e);
                    None
                }
            });

        let status = match &doc.report {
            Some(report) if !report.is_clean() => format!(
                "Loaded {} moves ({} integrity warnings)",
                series.len(),
                report.duplicate_ids.len() + report.dangling_links.len()
            ),
            _ => format!("Loaded {} moves", series.len()),
        };
        info!(points = series.len(), navigator = self.navigator.is_some(), "document installed");
        self.control_panel.set_progress(100.0, &status);
        self.control_panel.export_enabled = true;
        self.document = Some(doc);
    }

    /// Export the chart through a temporary bitmap surface.
    fn handle_export_png(&mut self) {
        let Some(doc) = &self.document else {
            self.control_panel.set_progress(0.0, "No chart to export");
            return;
        };

        let file_name = doc
            .path
            .as_ref()
            .and_then(|p| p.file_stem())
            .map(|s| format!("{}.png", s.to_string_lossy()))
            .unwrap_or_else(|| "cp_chart.png".to_string());

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name(file_name)
            .save_file()
        else {
            return; // User cancelled
        };

        self.control_panel.set_progress(50.0, "Rendering chart...");
        self.surfaces.register(
            EXPORT_SURFACE,
            Box::new(BitmapSurface::new(&path, DEFAULT_WIDTH, DEFAULT_HEIGHT)),
        );
        let result = render_cp_chart(&doc.evals, EXPORT_SURFACE, &mut self.surfaces);
        self.surfaces.remove(EXPORT_SURFACE);

        match result {
            Ok(()) => {
                self.control_panel
                    .set_progress(100.0, &format!("Exported {}", path.display()));
                if self.control_panel.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!(path = %path.display(), "could not open exported chart: {}", e);
                    }
                }
            }
            Err(e) => {
                error!("export failed: {}", e);
                self.control_panel
                    .set_progress(0.0, &format!("Error: {}", e));
            }
        }
    }

    fn apply_navigation(&mut self, action: NavigatorAction) {
        let (Some(nav), Some(tree)) = (
            self.navigator.as_mut(),
            self.document.as_ref().and_then(|d| d.tree.as_ref()),
        ) else {
            return;
        };
        let step = nav.apply(action, tree);
        debug!(?step, index = nav.current_index(), lookup = ?nav.lookup(), "navigation");
    }

    /// Arrow keys mirror the Previous and Next buttons.
    fn keyboard_action(ctx: &egui::Context) -> Option<NavigatorAction> {
        if ctx.wants_keyboard_input() {
            return None;
        }
        ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowLeft) {
                Some(NavigatorAction::Previous)
            } else if i.key_pressed(egui::Key::ArrowRight) {
                Some(NavigatorAction::Next)
            } else {
                None
            }
        })
    }
}

impl eframe::App for SfenViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(330.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseJson => self.handle_browse_json(),
                        ControlPanelAction::ExportPng => self.handle_export_png(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Right panel - Navigator
        let mut nav_action = None;
        if let (Some(nav), Some(tree)) = (
            self.navigator.as_ref(),
            self.document.as_ref().and_then(|d| d.tree.as_ref()),
        ) {
            let panel = &mut self.navigator_panel;
            SidePanel::right("navigator_panel")
                .min_width(320.0)
                .max_width(420.0)
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical().show(ui, |ui| {
                        nav_action = panel.show(ui, nav, tree);
                    });
                });
        }
        if self.navigator.is_some() {
            nav_action = nav_action.or_else(|| Self::keyboard_action(ctx));
        }
        if let Some(action) = nav_action {
            self.apply_navigation(action);
        }

        // Central panel - Chart Viewer
        let marker = self.navigator.as_ref().map(NavigatorState::current_index);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.chart_viewer.show(ui, marker);
        });
    }
}
