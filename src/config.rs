//! Command-line configuration.

use crate::charts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::navigator::NodeLookup;
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sfen-viewer", version, about = "Shogi analysis viewer")]
pub struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open the interactive viewer (default).
    View(ViewArgs),
    /// Render CP charts to PNG files.
    Chart(ChartArgs),
    /// Print the integrity report and evaluation summary of a file.
    Inspect(InspectArgs),
}

#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// Analysis JSON to open at startup.
    pub file: Option<PathBuf>,

    /// How the navigator resolves the active node.
    #[arg(long, value_enum, default_value_t = LookupArg::Index)]
    pub lookup: LookupArg,
}

#[derive(Args, Debug)]
pub struct ChartArgs {
    /// Input analysis JSON (repeatable).
    #[arg(long = "in", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory receiving `<stem>.png` per input.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    pub file: PathBuf,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LookupArg {
    /// First node with the current move index.
    #[default]
    Index,
    /// Node named by the top of the history stack.
    Id,
}

impl From<LookupArg> for NodeLookup {
    fn from(arg: LookupArg) -> Self {
        match arg {
            LookupArg::Index => NodeLookup::ByIndex,
            LookupArg::Id => NodeLookup::ById,
        }
    }
}

impl Cli {
    pub fn validate(&self) -> Result<()> {
        if self.log_level.trim().is_empty() {
            bail!("--log-level must not be empty");
        }
        if let Some(Command::Chart(args)) = &self.command {
            if args.inputs.is_empty() {
                bail!("chart needs at least one --in file");
            }
            if args.width == 0 || args.height == 0 {
                bail!(
                    "chart size must be non-zero, got {}x{}",
                    args.width,
                    args.height
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_view() {
        let cli = Cli::try_parse_from(["sfen-viewer"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn view_accepts_file_and_lookup() {
        let cli =
            Cli::try_parse_from(["sfen-viewer", "view", "game.json", "--lookup", "id"]).unwrap();
        let Some(Command::View(args)) = cli.command else {
            panic!("expected view");
        };
        assert_eq!(args.file, Some(PathBuf::from("game.json")));
        assert_eq!(NodeLookup::from(args.lookup), NodeLookup::ById);
    }

    #[test]
    fn chart_collects_inputs_and_defaults() {
        let cli = Cli::try_parse_from([
            "sfen-viewer",
            "chart",
            "--in",
            "a.json",
            "--in",
            "b.json",
            "--out-dir",
            "charts",
            "--log-level",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level, "debug");
        let Some(Command::Chart(args)) = &cli.command else {
            panic!("expected chart");
        };
        assert_eq!(args.inputs.len(), 2);
        assert_eq!(args.width, DEFAULT_WIDTH);
        assert_eq!(args.out_dir, PathBuf::from("charts"));
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn chart_requires_input() {
        assert!(Cli::try_parse_from(["sfen-viewer", "chart"]).is_err());
    }

    #[test]
    fn zero_size_is_rejected() {
        let cli = Cli::try_parse_from(["sfen-viewer", "chart", "--in", "a.json", "--width", "0"])
            .unwrap();
        assert!(cli.validate().is_err());
    }
}
