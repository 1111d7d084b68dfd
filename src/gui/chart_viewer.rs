//! Chart Viewer Widget
//! Central panel showing the interactive CP chart and its summary line.

use crate::charts::{ChartPlotter, PlotSurface, CP_CHART_STYLE};
use crate::stats::EvalSummary;
use egui::{Color32, RichText};

const SUMMARY_HEIGHT: f32 = 60.0;
const MIN_CHART_HEIGHT: f32 = 240.0;

/// Reads the plot surface each frame and draws whatever chart it holds.
pub struct ChartViewer {
    surface: PlotSurface,
    summary: Option<EvalSummary>,
}

impl ChartViewer {
    pub fn new(surface: PlotSurface) -> Self {
        Self {
            surface,
            summary: None,
        }
    }

    pub fn clear(&mut self) {
        self.surface.clear();
        self.summary = None;
    }

    pub fn set_summary(&mut self, summary: EvalSummary) {
        self.summary = Some(summary);
    }

    /// `marker` is the navigator's current move index.
    pub fn show(&mut self, ui: &mut egui::Ui, marker: Option<i64>) {
        let generation = self.surface.generation();
        let summary = self.summary.clone();

        self.surface.with_series(|series| {
            let Some(series) = series else {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
                return;
            };

            ui.vertical_centered(|ui| {
                ui.label(RichText::new(CP_CHART_STYLE.title).size(18.0).strong());
            });
            ui.add_space(6.0);

            let height = (ui.available_height() - SUMMARY_HEIGHT).max(MIN_CHART_HEIGHT);
            ChartPlotter::draw_cp_chart(ui, series, &CP_CHART_STYLE, marker, generation, height);

            ui.add_space(8.0);
            if let Some(summary) = summary {
                Self::draw_summary(ui, &summary, series.len());
            }
        });
    }

    fn draw_summary(ui: &mut egui::Ui, summary: &EvalSummary, total: usize) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal_wrapped(|ui| {
                    ui.label(
                        RichText::new(format!("Evaluated {}/{}", summary.count, total)).size(12.0),
                    );
                    if summary.count == 0 {
                        return;
                    }
                    ui.separator();
                    ui.label(RichText::new(format!("Mean {:.1}", summary.mean)).size(12.0));
                    ui.separator();
                    ui.label(RichText::new(format!("Median {:.1}", summary.median)).size(12.0));
                    ui.separator();
                    ui.label(RichText::new(format!("Std {:.1}", summary.std)).size(12.0));
                    ui.separator();
                    ui.label(
                        RichText::new(format!("Range [{:.0}, {:.0}]", summary.min, summary.max))
                            .size(12.0),
                    );
                    if let Some((index, delta)) = summary.largest_swing {
                        ui.separator();
                        ui.label(
                            RichText::new(format!("Largest swing {:+} at move {}", delta, index))
                                .size(12.0)
                                .color(Color32::from_rgb(220, 53, 69)),
                        );
                    }
                });
            });
    }
}
