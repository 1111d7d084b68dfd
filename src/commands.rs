//! Headless subcommands: batch chart rendering and file inspection.

use crate::charts::{render_cp_chart, BitmapSurface, CpSeries, SurfaceRegistry};
use crate::config::{ChartArgs, InspectArgs};
use crate::data::{AnalysisDocument, DataLoader};
use crate::stats::StatsCalculator;
use anyhow::{bail, Context as _, Result};
use rayon::prelude::*;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Render every input's chart in parallel. Each worker owns its surface.
pub fn run_chart(args: &ChartArgs) -> Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;

    let results: Vec<(&PathBuf, Result<PathBuf>)> = args
        .inputs
        .par_iter()
        .map(|input| {
            (
                input,
                render_one(input, &args.out_dir, args.width, args.height),
            )
        })
        .collect();

    let mut failures = 0usize;
    for (input, result) in results {
        match result {
            Ok(out) => println!("{} -> {}", input.display(), out.display()),
            Err(e) => {
                error!(input = %input.display(), "{:#}", e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} charts failed", failures, args.inputs.len());
    }
    info!(count = args.inputs.len(), "charts rendered");
    Ok(())
}

pub fn chart_output_path(input: &Path, out_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "chart".to_string());
    out_dir.join(format!("{}.png", stem))
}

fn render_one(input: &Path, out_dir: &Path, width: u32, height: u32) -> Result<PathBuf> {
    let doc = DataLoader::load_json(input)?;
    let out = chart_output_path(input, out_dir);

    let surface_id = out.display().to_string();
    let mut registry = SurfaceRegistry::new();
    registry.register(
        surface_id.clone(),
        Box::new(BitmapSurface::new(&out, width, height)),
    );
    render_cp_chart(&doc.evals, &surface_id, &mut registry)
        .with_context(|| format!("render '{}'", input.display()))?;
    Ok(out)
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let doc = DataLoader::load_json(&args.file)
        .with_context(|| format!("load '{}'", args.file.display()))?;
    print!("{}", format_inspection(&doc));
    Ok(())
}

/// Plain-text report printed by `inspect`.
pub fn format_inspection(doc: &AnalysisDocument) -> String {
    let mut out = String::new();
    let series = CpSeries::from_eval_data(&doc.evals);
    let summary = StatsCalculator::summarize(&series);

    if let Some(meta) = doc.tree.as_ref().and_then(|t| t.meta.as_ref()) {
        let _ = writeln!(out, "game: {}", meta.id.as_deref().unwrap_or("-"));
        let _ = writeln!(
            out,
            "players: {} (black) vs {} (white)",
            meta.data.black_player.as_deref().unwrap_or("?"),
            meta.data.white_player.as_deref().unwrap_or("?")
        );
    }

    match &doc.report {
        Some(report) => {
            let _ = writeln!(out, "nodes: {}", report.node_count);
            let _ = writeln!(out, "branch points: {}", report.branch_points);
            if let Some(tree) = &doc.tree {
                let lines = tree.paths();
                let longest = lines.iter().map(Vec::len).max().unwrap_or(0);
                let _ = writeln!(out, "lines: {} (longest {} positions)", lines.len(), longest);
            }
            for id in &report.duplicate_ids {
                let _ = writeln!(out, "duplicate id: {}", id);
            }
            for (parent, child) in &report.dangling_links {
                let _ = writeln!(out, "dangling link: {} -> {}", parent, child);
            }
            for (index, ids) in &report.shared_indices {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                let _ = writeln!(out, "shared index {}: {}", index, ids.join(", "));
            }
        }
        None => {
            let _ = writeln!(out, "nodes: {} (chart only)", doc.evals.nodes.len());
        }
    }

    let _ = writeln!(out, "evaluated: {}/{}", summary.count, series.len());
    if summary.count > 0 {
        let _ = writeln!(
            out,
            "cp mean {:.1}, median {:.1}, std {:.1}, range [{:.0}, {:.0}]",
            summary.mean, summary.median, summary.std, summary.min, summary.max
        );
    }
    if let Some((index, delta)) = summary.largest_swing {
        let _ = writeln!(out, "largest swing: {:+} at move {}", delta, index);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_uses_input_stem() {
        assert_eq!(
            chart_output_path(Path::new("data/game01.kif.json"), Path::new("out")),
            PathBuf::from("out/game01.kif.png")
        );
    }

    #[test]
    fn inspection_lists_integrity_findings() {
        let doc = DataLoader::load_str(
            r#"{
                "meta": { "id": "g.kif", "data": { "black_player": "A", "white_player": "B" } },
                "nodes": [
                    { "id": 1, "index": 0, "sfen": "s0", "cp": 30, "move": "", "next_ids": [2, 3], "pv": [] },
                    { "id": 2, "index": 1, "sfen": "s1", "cp": -470, "move": "x", "next_ids": [9], "pv": [] },
                    { "id": 3, "index": 1, "sfen": "s2", "move": "y", "next_ids": [], "pv": [] }
                ]
            }"#,
        )
        .unwrap();
        let text = format_inspection(&doc);
        assert!(text.contains("game: g.kif"));
        assert!(text.contains("players: A (black) vs B (white)"));
        assert!(text.contains("nodes: 3"));
        assert!(text.contains("branch points: 1"));
        assert!(text.contains("lines: 2 (longest 2 positions)"));
        assert!(text.contains("dangling link: 2 -> 9"));
        assert!(text.contains("shared index 1: 2, 3"));
        assert!(text.contains("evaluated: 2/3"));
        assert!(text.contains("largest swing: -500 at move 1"));
    }

    #[test]
    fn inspection_of_chart_only_file() {
        let doc = DataLoader::load_str(r#"{ "nodes": [ { "index": 0, "cp": 1 } ] }"#).unwrap();
        let text = format_inspection(&doc);
        assert!(text.contains("nodes: 1 (chart only)"));
        assert!(text.contains("evaluated: 1/1"));
    }

    #[test]
    fn inspection_of_document_without_nodes() {
        let doc = DataLoader::load_str("{}").unwrap();
        let text = format_inspection(&doc);
        assert!(text.contains("nodes: 0 (chart only)"));
        assert!(text.contains("evaluated: 0/0"));
    }
}
