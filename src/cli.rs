//! Command-line interface definitions

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::CliOverrides;
use crate::crop::{CropOptions, Rect};

/// Process exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INPUT_NOT_FOUND: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Tighten rough bounding rectangles around dark text in images
#[derive(Debug, Parser)]
#[command(name = "crop-adjust", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Refine rectangles against an image
    Refine(RefineArgs),
    /// Show version, effective defaults and config file locations
    Info,
}

/// Named option sets selectable with `--preset`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Narrow tolerance band for clean, high-contrast scans
    Strict,
    /// Wide band and longer outward search for faded or noisy scans
    Loose,
}

impl Preset {
    pub fn options(self) -> CropOptions {
        match self {
            Self::Strict => CropOptions::strict(),
            Self::Loose => CropOptions::loose(),
        }
    }
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("input").required(true).multiple(true).args(["rects", "rect"])))]
pub struct RefineArgs {
    /// Image file (any format the image crate decodes)
    pub image: PathBuf,

    /// Rectangle list file, one `x,y,w,h` per line
    #[arg(short, long)]
    pub rects: Option<PathBuf>,

    /// Rectangle given directly as `x,y,w,h` (repeatable)
    #[arg(long = "rect", value_name = "X,Y,W,H", allow_hyphen_values = true)]
    pub rect: Vec<Rect>,

    /// Start from a named option set instead of the config file values
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Dark-rate threshold a row/column must exceed to count as dark
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Maximum pixels to search outward from an edge
    #[arg(long)]
    pub search_range: Option<u32>,

    /// +/- luminance band around the dark reference
    #[arg(long, allow_hyphen_values = true)]
    pub tolerance: Option<i32>,

    /// Padding ratio applied to the refined rectangle
    #[arg(long)]
    pub expand_ratio: Option<f64>,

    /// Config file (default: ./crop-adjust.toml or the user config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl RefineArgs {
    /// Options set explicitly on the command line
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            preset: self.preset.map(Preset::options),
            threshold: self.threshold,
            search_range: self.search_range,
            tolerance: self.tolerance,
            expand_ratio: self.expand_ratio,
        }
    }
}
