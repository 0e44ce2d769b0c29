//! crop-adjust - bounding rectangle refinement for dark content
//!
//! Takes the rough rectangles an upstream detector produces (for example
//! around printed text) and adjusts each edge to where dark pixels give way
//! to background, then pads the result by a fixed ratio.
//!
//! # Modules
//!
//! - [`crop`] - luminance grid, dark reference, edge scanning and refinement
//! - [`rect_list`] - `x,y,w,h` rectangle list reader
//! - [`batch`] - image + rectangle list processing with GIVEN/FIXED reports
//! - [`config`] - TOML configuration and CLI overrides
//! - [`cli`] - command-line definitions
//!
//! # Example
//!
//! ```rust
//! use crop_adjust::{LumaGrid, Rect, RectRefiner};
//!
//! // White page with a black block at (20, 20, 40, 10)
//! let grid = LumaGrid::from_fn(100, 100, |x, y| {
//!     if (20..60).contains(&x) && (20..30).contains(&y) { 0 } else { 255 }
//! });
//!
//! let refiner = RectRefiner::default();
//! let found = refiner.search(&grid, &Rect::new(15, 18, 49, 13));
//! assert_eq!(found, Rect::new(20, 20, 40, 10));
//! ```

pub mod batch;
pub mod cli;
pub mod config;
pub mod crop;
pub mod rect_list;

pub use batch::{BatchRefiner, BatchReport, RefinedEntry};
pub use cli::{exit_codes, Cli, Commands, Preset, RefineArgs};
pub use config::{CliOverrides, Config, ConfigError};
pub use crop::{
    dark_rate, darkest_average, darkness_sample, CropError, CropOptions, CropOptionsBuilder,
    DarkBand, LumaGrid, ParseRectError, Rect, RectRefiner, Result, ScanAxis,
};
pub use rect_list::{parse_rect_list, read_rect_list, RectEntry};
