//! SFEN Viewer - Shogi analysis chart & tree navigator
//!
//! Opens analysis JSON produced by the engine pipeline, plots the centipawn
//! evaluation per move and walks the position tree.

mod charts;
mod commands;
mod config;
mod data;
mod gui;
mod navigator;
mod stats;

use anyhow::Result;
use clap::Parser;
use config::{Cli, Command, ViewArgs};
use eframe::egui;
use gui::SfenViewerApp;
use tracing::info;

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_viewer(args: ViewArgs) -> Result<()> {
    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 800.0])
            .with_min_inner_size([1000.0, 600.0])
            .with_title("SFEN Viewer"),
        ..Default::default()
    };

    let lookup = args.lookup.into();
    let initial_file = args.file;

    // Run the application
    eframe::run_native(
        "SFEN Viewer",
        options,
        Box::new(move |cc| Ok(Box::new(SfenViewerApp::new(cc, lookup, initial_file)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer exited with error: {}", e))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.validate()?;
    init_tracing(&cli.log_level);
    info!(log_level = %cli.log_level, "tracing initialized");

    match cli.command {
        None => run_viewer(ViewArgs::default()),
        Some(Command::View(args)) => run_viewer(args),
        Some(Command::Chart(args)) => commands::run_chart(&args),
        Some(Command::Inspect(args)) => commands::run_inspect(&args),
    }
}
