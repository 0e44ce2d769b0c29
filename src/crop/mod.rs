//! Crop Adjustment module
//!
//! Tightens an approximate bounding rectangle (for example from a text
//! detector) so it frames the dark content inside it.
//!
//! # Features
//!
//! - BT.601 grayscale conversion into a read-only [`LumaGrid`]
//! - Dark reference estimation (stricter of window average and minimum)
//! - Row/column dark-rate scanning with a tolerance band
//! - Per-edge boundary search with skip-counter noise gating
//! - Fixed-ratio padding of the refined rectangle
//!
//! # Example
//!
//! ```rust,no_run
//! use crop_adjust::{CropOptions, LumaGrid, Rect, RectRefiner};
//! use std::path::Path;
//!
//! let grid = LumaGrid::open(Path::new("page.png")).unwrap();
//! let refiner = RectRefiner::new(CropOptions::builder().tolerance(20).build());
//!
//! let fixed = refiner.refine(&grid, &Rect::new(190, 125, 172, 31));
//! println!("Adjusted rectangle: {}", fixed);
//! ```

// Submodules
mod darkness;
mod grid;
mod refine;
mod scan;
mod types;

// Re-export public API
pub use darkness::{darkest_average, darkness_sample};
pub use grid::LumaGrid;
pub use refine::RectRefiner;
pub use scan::{dark_rate, DarkBand, ScanAxis};
pub use types::{
    CropError, CropOptions, CropOptionsBuilder, ParseRectError, Rect, Result,
    DEFAULT_EXPAND_RATIO, DEFAULT_SEARCH_RANGE, DEFAULT_THRESHOLD, DEFAULT_TOLERANCE,
};
