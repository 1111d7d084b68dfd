//! Static Chart Renderer
//! Draws the CP evaluation chart into a PNG with plotters.
//!
//! Layout:
//! 1. Title centered at the top
//! 2. Line chart, y axis fixed to the configured range
//! 3. Axis titles and a single-entry legend

use crate::charts::series::{ChartStyle, CpSeries};
use crate::charts::surface::{ChartSurface, RenderError};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::info;

pub const DEFAULT_WIDTH: u32 = 1200;
pub const DEFAULT_HEIGHT: u32 = 700;

// Colors
const GRID: RGBColor = RGBColor(220, 220, 220);
const ZERO_LINE: RGBColor = RGBColor(120, 120, 120);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart to in-memory PNG bytes.
    pub fn render_to_png_bytes(
        series: &CpSeries,
        style: &ChartStyle,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let mut pixels = vec![0u8; (width as usize) * (height as usize) * 3];
        Self::draw_into(&mut pixels, series, style, width, height)?;

        let img = RgbImage::from_raw(width, height, pixels)
            .ok_or_else(|| RenderError::Drawing("pixel buffer size mismatch".to_string()))?;
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Render the chart and write it to `path`.
    pub fn render_to_file(
        series: &CpSeries,
        style: &ChartStyle,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let bytes = Self::render_to_png_bytes(series, style, width, height)?;
        Self::write_png(path, &bytes)?;
        info!(path = %path.display(), points = series.len(), "chart written");
        Ok(())
    }

    fn write_png(path: &Path, bytes: &[u8]) -> Result<(), RenderError> {
        std::fs::write(path, bytes).map_err(|source| RenderError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// X range padded so a single point or an empty chart still has width.
    pub fn x_range(series: &CpSeries) -> (f64, f64) {
        match series.x_bounds() {
            None => (0.0, 1.0),
            Some((lo, hi)) if lo == hi => (lo as f64 - 1.0, hi as f64 + 1.0),
            Some((lo, hi)) => (lo as f64, hi as f64),
        }
    }

    fn draw_into(
        pixels: &mut [u8],
        series: &CpSeries,
        style: &ChartStyle,
        width: u32,
        height: u32,
    ) -> Result<(), RenderError> {
        let drawing = |e: &dyn std::fmt::Display| RenderError::Drawing(e.to_string());

        let root = BitMapBackend::with_buffer(pixels, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| drawing(&e))?;

        let (x_min, x_max) = Self::x_range(series);
        let (y_min, y_max) = style.y_range;

        let mut chart = ChartBuilder::on(&root)
            .caption(style.title, ("sans-serif", 24))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| drawing(&e))?;

        chart
            .configure_mesh()
            .light_line_style(GRID.stroke_width(1))
            .x_desc(style.x_axis_title)
            .y_desc(style.y_axis_title)
            .x_label_formatter(&|x| format!("{:.0}", x))
            .y_label_formatter(&|y| format!("{:.0}", y))
            .draw()
            .map_err(|e| drawing(&e))?;

        chart
            .draw_series(LineSeries::new(
                [(x_min, 0.0), (x_max, 0.0)],
                ZERO_LINE.stroke_width(1),
            ))
            .map_err(|e| drawing(&e))?;

        let (r, g, b) = style.color;
        let color = RGBColor(r, g, b);
        let line_style = color.stroke_width(style.line_width.round() as u32);

        for (i, run) in series.smoothed_runs(style).iter().enumerate() {
            let points: Vec<(f64, f64)> = run.iter().map(|p| (p[0], p[1])).collect();

            if style.fill {
                chart
                    .draw_series(AreaSeries::new(points.clone(), 0.0, color.mix(0.2).filled()))
                    .map_err(|e| drawing(&e))?;
            }

            let anno = chart
                .draw_series(LineSeries::new(points, line_style))
                .map_err(|e| drawing(&e))?;
            if i == 0 {
                anno.label(style.dataset_label).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], line_style)
                });
            }
        }

        if !series.is_empty() {
            chart
                .configure_series_labels()
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .draw()
                .map_err(|e| drawing(&e))?;
        }

        root.present().map_err(|e| drawing(&e))?;
        Ok(())
    }
}

/// PNG file target used by the batch `chart` command and the export button.
pub struct BitmapSurface {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl BitmapSurface {
    pub fn new(path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
        Self {
            path: path.into(),
            width,
            height,
        }
    }
}

impl ChartSurface for BitmapSurface {
    fn draw(&mut self, series: &CpSeries, style: &ChartStyle) -> Result<(), RenderError> {
        StaticChartRenderer::render_to_file(series, style, &self.path, self.width, self.height)
    }
}
