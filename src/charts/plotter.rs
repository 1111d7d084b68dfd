//! Chart Plotter Module
//! Draws the CP evaluation chart interactively with egui_plot.

use crate::charts::series::{ChartStyle, CpSeries};
use egui::Color32;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points, VLine};

/// Navigator position marker
pub const MARKER_COLOR: Color32 = Color32::from_rgb(231, 76, 60); // Red
const ZERO_COLOR: Color32 = Color32::from_rgb(150, 150, 150);

pub struct ChartPlotter;

impl ChartPlotter {
    pub fn style_color(style: &ChartStyle) -> Color32 {
        let (r, g, b) = style.color;
        Color32::from_rgb(r, g, b)
    }

    /// Draw the evaluation line chart.
    ///
    /// `generation` changes whenever the surface receives new data, which
    /// gives the plot a fresh id and resets any zoom or pan.
    pub fn draw_cp_chart(
        ui: &mut egui::Ui,
        series: &CpSeries,
        style: &ChartStyle,
        marker: Option<i64>,
        generation: u64,
        height: f32,
    ) {
        let color = Self::style_color(style);
        let (y_min, y_max) = style.y_range;
        let runs = series.smoothed_runs(style);
        let raw_points: Vec<[f64; 2]> = series
            .points()
            .map(|(x, y)| [x as f64, y as f64])
            .collect();

        Plot::new(("cp_chart", generation))
            .height(height)
            .legend(Legend::default())
            .x_axis_label(style.x_axis_title)
            .y_axis_label(style.y_axis_title)
            .include_y(y_min)
            .include_y(y_max)
            .allow_scroll(false)
            .label_formatter(|_name, value| format!("Move {:.0}\nCP {:.0}", value.x, value.y))
            .show(ui, |plot_ui| {
                if let Some((lo, hi)) = series.x_bounds() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[lo as f64, 0.0], [hi as f64, 0.0]]))
                            .color(ZERO_COLOR)
                            .width(1.0),
                    );
                }

                for (i, run) in runs.into_iter().enumerate() {
                    let mut line = Line::new(PlotPoints::from(run))
                        .color(color)
                        .width(style.line_width);
                    if style.fill {
                        line = line.fill(0.0_f32);
                    }
                    // One legend entry for the whole dataset
                    if i == 0 {
                        line = line.name(style.dataset_label);
                    }
                    plot_ui.line(line);
                }

                plot_ui.points(Points::new(PlotPoints::from(raw_points)).radius(2.0).color(color));

                if let Some(x) = marker {
                    plot_ui.vline(
                        VLine::new(x as f64)
                            .color(MARKER_COLOR)
                            .width(1.5)
                            .name("Current move"),
                    );
                }
            });
    }
}
