//! Evaluation Summary Module
//! Descriptive statistics over the clamped CP series.

use crate::charts::CpSeries;
use statrs::statistics::{Data, Median, Statistics};

/// Summary of one game's evaluation curve.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Largest absolute change between consecutive evaluated moves, as
    /// `(index of the later move, signed delta)`.
    pub largest_swing: Option<(i64, i64)>,
}

impl Default for EvalSummary {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            median: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            largest_swing: None,
        }
    }
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute the summary; unevaluated nodes are skipped.
    pub fn summarize(series: &CpSeries) -> EvalSummary {
        let points: Vec<(i64, i64)> = series.points().collect();
        if points.is_empty() {
            return EvalSummary::default();
        }

        let values: Vec<f64> = points.iter().map(|&(_, cp)| cp as f64).collect();
        let std = if values.len() > 1 {
            values.iter().std_dev()
        } else {
            0.0
        };

        EvalSummary {
            count: values.len(),
            mean: values.iter().mean(),
            median: Data::new(values.clone()).median(),
            std,
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
            largest_swing: Self::largest_swing(&points),
        }
    }

    fn largest_swing(points: &[(i64, i64)]) -> Option<(i64, i64)> {
        points
            .windows(2)
            .map(|w| (w[1].0, w[1].1 - w[0].1))
            .max_by_key(|&(_, delta)| delta.abs())
    }
}
