//! Stats module - evaluation summary statistics

mod calculator;

pub use calculator::{EvalSummary, StatsCalculator};
