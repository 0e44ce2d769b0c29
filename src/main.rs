//! crop-adjust - bounding rectangle refinement
//!
//! CLI entry point

use anyhow::Context;
use clap::Parser;
use crop_adjust::{
    exit_codes,
    // Batch processing
    read_rect_list, BatchRefiner, RectEntry,
    // CLI
    Cli, Commands, Preset, RefineArgs,
    // Config
    Config, ConfigError, CropOptions,
    // Errors
    CropError,
};
use std::io::Write;
use tracing::Level;

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Refine(args) => run_refine(&args),
        Commands::Info => run_info(),
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit_code_for(&e)
        }
    });
}

// ============ Logging ============

/// Install the stderr log subscriber; stdout is reserved for the report
fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::ERROR,
        (false, 0) => Level::WARN,
        (false, 1) => Level::INFO,
        (false, 2) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Map the root cause of a failure to a process exit code
fn exit_code_for(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<CropError>() {
        return match e {
            CropError::ImageNotFound(_) | CropError::RectListNotFound(_) => {
                exit_codes::INPUT_NOT_FOUND
            }
            CropError::InvalidImage(_)
            | CropError::InvalidGrid(_)
            | CropError::InvalidRectLine { .. } => exit_codes::INVALID_INPUT,
            CropError::IoError(_) => exit_codes::GENERAL_ERROR,
        };
    }

    if let Some(e) = error.downcast_ref::<ConfigError>() {
        return match e {
            ConfigError::NotFound(_) => exit_codes::INPUT_NOT_FOUND,
            ConfigError::Parse(_) => exit_codes::INVALID_INPUT,
            ConfigError::Io(_) => exit_codes::GENERAL_ERROR,
        };
    }

    exit_codes::GENERAL_ERROR
}

// ============ Refine Command ============

fn run_refine(args: &RefineArgs) -> anyhow::Result<()> {
    init_logging(args.verbose, args.quiet);

    // An explicit config must load; the default lookup falls back to defaults
    let file_config = match &args.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load config file: {}", e);
            Config::default()
        }),
    };

    let options = file_config.merge_with_cli(&args.overrides());
    tracing::debug!(?options, "effective options");

    let mut entries = match &args.rects {
        Some(path) => read_rect_list(path)
            .with_context(|| format!("reading rectangles from {}", path.display()))?,
        None => Vec::new(),
    };
    entries.extend(args.rect.iter().map(|rect| RectEntry {
        line: 0,
        rect: *rect,
    }));

    let report = BatchRefiner::new(options)
        .process_image(&args.image, &entries)
        .with_context(|| format!("processing {}", args.image.display()))?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        report.write_json(&mut out)?;
    } else {
        report.write_text(&mut out)?;
    }
    out.flush()?;

    tracing::info!(
        count = report.entries.len(),
        degenerate = report.degenerate_count(),
        "refinement finished"
    );

    Ok(())
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<()> {
    println!("crop-adjust v{}", env!("CARGO_PKG_VERSION"));
    println!();

    let defaults = CropOptions::default();
    println!("Default Options:");
    println!("  Threshold:    {}", defaults.threshold);
    println!("  Search range: {} px", defaults.search_range);
    println!("  Tolerance:    +/-{}", defaults.tolerance);
    println!("  Expand ratio: {}", defaults.expand_ratio);

    println!();
    println!("Presets (--preset):");
    for (name, preset) in [("strict", Preset::Strict), ("loose", Preset::Loose)] {
        let options = preset.options();
        println!(
            "  {:<8} tolerance +/-{}, search range {} px",
            name, options.tolerance, options.search_range
        );
    }

    println!();
    println!("Config File Locations:");
    for path in Config::search_paths() {
        let status = if path.is_file() { "found" } else { "not found" };
        println!("  {} ({})", path.display(), status);
    }

    Ok(())
}
