//! CP Series Module
//! Pure transform from evaluation nodes to chart-ready data, plus the fixed
//! chart configuration shared by every surface.

use crate::data::{EvalData, EvalNode};

/// Evaluations are clamped into `[-CP_CAP, CP_CAP]`.
pub const CP_CAP: i64 = 3300;
/// The y axis is wider than the clamp to leave a margin.
pub const Y_AXIS_LIMIT: f64 = 3500.0;

/// Fixed configuration of the evaluation chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartStyle {
    pub title: &'static str,
    pub dataset_label: &'static str,
    pub x_axis_title: &'static str,
    pub y_axis_title: &'static str,
    pub y_range: (f64, f64),
    pub line_width: f32,
    pub fill: bool,
    pub tension: f64,
    /// RGB
    pub color: (u8, u8, u8),
}

pub const CP_CHART_STYLE: ChartStyle = ChartStyle {
    title: "CP Evaluation per Move (Capped at ±3300)",
    dataset_label: "Centipawn Evaluation",
    x_axis_title: "Move Index",
    y_axis_title: "Centipawn Score",
    y_range: (-Y_AXIS_LIMIT, Y_AXIS_LIMIT),
    line_width: 2.0,
    fill: false,
    tension: 0.1,
    color: (0, 0, 255),
};

/// Sub-segments drawn per Bézier span.
const SAMPLES_PER_SEGMENT: usize = 8;

/// Nominal plot size in pixels. Only its aspect ratio affects smoothing.
const REFERENCE_FRAME: [f64; 2] = [1200.0, 700.0];

pub fn clamp_cp(cp: i64) -> i64 {
    cp.clamp(-CP_CAP, CP_CAP)
}

/// Labels and values ready to hand to a drawing surface.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpSeries {
    pub labels: Vec<i64>,
    /// `None` marks an unevaluated node and breaks the line.
    pub values: Vec<Option<i64>>,
}

impl CpSeries {
    pub fn from_nodes(nodes: &[EvalNode]) -> Self {
        let (labels, values) = nodes
            .iter()
            .map(|n| (n.index, n.cp.map(clamp_cp)))
            .unzip();
        Self { labels, values }
    }

    pub fn from_eval_data(data: &EvalData) -> Self {
        Self::from_nodes(&data.nodes)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// `(index, value)` pairs, skipping unevaluated nodes.
    pub fn points(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.labels
            .iter()
            .zip(&self.values)
            .filter_map(|(&x, y)| y.map(|y| (x, y)))
    }

    /// Contiguous evaluated runs as float points.
    pub fn runs(&self) -> Vec<Vec<[f64; 2]>> {
        let mut runs = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        for (&x, y) in self.labels.iter().zip(&self.values) {
            match y {
                Some(y) => current.push([x as f64, *y as f64]),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    /// Polylines to draw for the style's tension.
    pub fn smoothed_runs(&self, style: &ChartStyle) -> Vec<Vec<[f64; 2]>> {
        let scale = self.pixel_scale(style);
        self.runs()
            .iter()
            .map(|run| smooth_polyline(run, style.tension, SAMPLES_PER_SEGMENT, scale))
            .collect()
    }

    /// Pixels per data unit on each axis for a plot of `REFERENCE_FRAME` size.
    pub fn pixel_scale(&self, style: &ChartStyle) -> [f64; 2] {
        let x_span = self
            .x_bounds()
            .map(|(lo, hi)| (hi - lo) as f64)
            .filter(|span| *span > 0.0)
            .unwrap_or(1.0);
        let (y_min, y_max) = style.y_range;
        let y_span = if y_max > y_min { y_max - y_min } else { 1.0 };
        [REFERENCE_FRAME[0] / x_span, REFERENCE_FRAME[1] / y_span]
    }

    /// Min and max label, for the x axis.
    pub fn x_bounds(&self) -> Option<(i64, i64)> {
        let min = self.labels.iter().copied().min()?;
        let max = self.labels.iter().copied().max()?;
        Some((min, max))
    }
}

/// Cardinal-spline smoothing with Chart.js control-point placement.
///
/// Every original point is kept; `samples` points are inserted per span.
/// A tension of zero returns the input unchanged. Neighbor distances are
/// measured after multiplying each axis by `scale`, so the curve bends as it
/// would in pixel space; the output stays in data units.
pub fn smooth_polyline(
    points: &[[f64; 2]],
    tension: f64,
    samples: usize,
    scale: [f64; 2],
) -> Vec<[f64; 2]> {
    if tension == 0.0 || points.len() < 3 || samples < 2 {
        return points.to_vec();
    }

    let n = points.len();
    let mut controls: Vec<([f64; 2], [f64; 2])> = Vec::with_capacity(n);
    for i in 0..n {
        let prev = points[i.saturating_sub(1)];
        let cur = points[i];
        let next = points[(i + 1).min(n - 1)];

        let d01 = distance(prev, cur, scale);
        let d12 = distance(cur, next, scale);
        let total = d01 + d12;
        let (fa, fb) = if total == 0.0 {
            (0.0, 0.0)
        } else {
            (tension * d01 / total, tension * d12 / total)
        };

        let before = [
            cur[0] - fa * (next[0] - prev[0]),
            cur[1] - fa * (next[1] - prev[1]),
        ];
        let after = [
            cur[0] + fb * (next[0] - prev[0]),
            cur[1] + fb * (next[1] - prev[1]),
        ];
        controls.push((before, after));
    }

    let mut out = Vec::with_capacity((n - 1) * samples + 1);
    out.push(points[0]);
    for i in 0..n - 1 {
        let p0 = points[i];
        let c0 = controls[i].1;
        let c1 = controls[i + 1].0;
        let p1 = points[i + 1];
        for s in 1..=samples {
            let t = s as f64 / samples as f64;
            out.push(cubic_bezier(p0, c0, c1, p1, t));
        }
    }
    out
}

fn distance(a: [f64; 2], b: [f64; 2], scale: [f64; 2]) -> f64 {
    (((b[0] - a[0]) * scale[0]).powi(2) + ((b[1] - a[1]) * scale[1]).powi(2)).sqrt()
}

fn cubic_bezier(p0: [f64; 2], c0: [f64; 2], c1: [f64; 2], p1: [f64; 2], t: f64) -> [f64; 2] {
    let u = 1.0 - t;
    let a = u * u * u;
    let b = 3.0 * u * u * t;
    let c = 3.0 * u * t * t;
    let d = t * t * t;
    [
        a * p0[0] + b * c0[0] + c * c1[0] + d * p1[0],
        a * p0[1] + b * c0[1] + c * c1[1] + d * p1[1],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(index: i64, cp: Option<i64>) -> EvalNode {
        EvalNode { index, cp }
    }

    #[test]
    fn clamps_into_cap() {
        assert_eq!(clamp_cp(5000), 3300);
        assert_eq!(clamp_cp(-9999), -3300);
        assert_eq!(clamp_cp(120), 120);
        assert_eq!(clamp_cp(3300), 3300);
        assert_eq!(clamp_cp(-3300), -3300);
    }

    #[test]
    fn every_value_matches_min_max_formula() {
        let cps = [-100_000, -3301, -3300, -1, 0, 1, 3299, 3300, 3301, 42_000];
        let nodes: Vec<EvalNode> = cps
            .iter()
            .enumerate()
            .map(|(i, &cp)| node(i as i64, Some(cp)))
            .collect();
        let series = CpSeries::from_nodes(&nodes);
        for (value, cp) in series.values.iter().zip(cps) {
            assert_eq!(*value, Some((-3300i64).max(3300i64.min(cp))));
        }
    }

    #[test]
    fn labels_pass_through_unchanged() {
        let series = CpSeries::from_nodes(&[node(7, Some(1)), node(3, Some(2)), node(7, None)]);
        assert_eq!(series.labels, vec![7, 3, 7]);
        assert_eq!(series.values, vec![Some(1), Some(2), None]);
        assert_eq!(series.x_bounds(), Some((3, 7)));
    }

    #[test]
    fn empty_input_yields_empty_series() {
        let series = CpSeries::from_eval_data(&EvalData::default());
        assert!(series.is_empty());
        assert!(series.runs().is_empty());
        assert_eq!(series.x_bounds(), None);
    }

    #[test]
    fn gaps_split_runs() {
        let series = CpSeries::from_nodes(&[
            node(0, Some(10)),
            node(1, Some(20)),
            node(2, None),
            node(3, Some(-30)),
        ]);
        let runs = series.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], vec![[0.0, 10.0], [1.0, 20.0]]);
        assert_eq!(runs[1], vec![[3.0, -30.0]]);
        assert_eq!(series.points().collect::<Vec<_>>(), vec![(0, 10), (1, 20), (3, -30)]);
    }

    #[test]
    fn zero_tension_keeps_polyline() {
        let pts = vec![[0.0, 0.0], [1.0, 100.0], [2.0, -50.0]];
        assert_eq!(smooth_polyline(&pts, 0.0, 8, [1.0, 1.0]), pts);
    }

    #[test]
    fn smoothing_passes_through_original_points() {
        let pts = vec![[0.0, 0.0], [1.0, 100.0], [2.0, -50.0], [3.0, 10.0]];
        let out = smooth_polyline(&pts, 0.1, 4, [1.0, 1.0]);
        assert_eq!(out.len(), 3 * 4 + 1);
        for (i, p) in pts.iter().enumerate() {
            let q = out[i * 4];
            assert!((q[0] - p[0]).abs() < 1e-9 && (q[1] - p[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn straight_line_stays_straight() {
        let pts = vec![[0.0, 0.0], [1.0, 10.0], [2.0, 20.0]];
        for p in smooth_polyline(&pts, 0.1, 5, [1.0, 1.0]) {
            assert!((p[1] - 10.0 * p[0]).abs() < 1e-9);
        }
    }

    #[test]
    fn distances_use_scaled_axes() {
        let pts = vec![[0.0, 0.0], [1.0, 3.0], [2.0, 3.0], [3.0, -1.0]];
        let tall: Vec<[f64; 2]> = pts.iter().map(|p| [p[0], p[1] * 1000.0]).collect();

        let out = smooth_polyline(&pts, 0.1, 6, [1.0, 1.0]);
        let tall_out = smooth_polyline(&tall, 0.1, 6, [1.0, 0.001]);
        assert_eq!(out.len(), tall_out.len());
        for (p, q) in out.iter().zip(&tall_out) {
            assert!((p[0] - q[0]).abs() < 1e-9);
            assert!((p[1] * 1000.0 - q[1]).abs() < 1e-6);
        }

        // Unscaled centipawn distances would give a different curve.
        let raw = smooth_polyline(&tall, 0.1, 6, [1.0, 1.0]);
        assert!(raw.iter().zip(&tall_out).any(|(a, b)| (a[1] - b[1]).abs() > 1e-3));
    }

    #[test]
    fn pixel_scale_follows_plot_frame() {
        let series = CpSeries::from_nodes(&[node(0, Some(0)), node(4, Some(100))]);
        assert_eq!(series.pixel_scale(&CP_CHART_STYLE), [300.0, 0.1]);
        assert_eq!(CpSeries::default().pixel_scale(&CP_CHART_STYLE), [1200.0, 0.1]);
    }

    #[test]
    fn style_is_fixed() {
        assert_eq!(CP_CHART_STYLE.y_range, (-3500.0, 3500.0));
        assert_eq!(CP_CHART_STYLE.tension, 0.1);
        assert_eq!(CP_CHART_STYLE.line_width, 2.0);
        assert!(!CP_CHART_STYLE.fill);
        assert_eq!(CP_CHART_STYLE.title, "CP Evaluation per Move (Capped at ±3300)");
    }
}
