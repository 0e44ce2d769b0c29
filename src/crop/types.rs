//! Crop module core types
//!
//! Contains the rectangle value type, refinement options and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// ============================================================
// Constants
// ============================================================

/// Default dark-rate cutoff (a row/column is "dark" when its rate is above this)
pub const DEFAULT_THRESHOLD: f64 = 0.0;

/// Default number of pixels scanned outward when an edge starts on dark content
pub const DEFAULT_SEARCH_RANGE: u32 = 20;

/// Default +/- luminance band around the dark reference
pub const DEFAULT_TOLERANCE: i32 = 20;

/// Default padding ratio applied to the refined width/height
pub const DEFAULT_EXPAND_RATIO: f64 = 0.1;

/// Tolerance used by the strict preset
const STRICT_TOLERANCE: i32 = 10;

/// Tolerance used by the loose preset
const LOOSE_TOLERANCE: i32 = 40;

/// Search range used by the loose preset
const LOOSE_SEARCH_RANGE: u32 = 40;

/// Rectangle width per skip-counter step on the X axis
pub const SKIP_WIDTH_DIVISOR: i32 = 40;

// ============================================================
// Error Types
// ============================================================

/// Crop adjustment error types
#[derive(Debug, Error)]
pub enum CropError {
    #[error("Image not found: {0}")]
    ImageNotFound(PathBuf),

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("Rectangle list not found: {0}")]
    RectListNotFound(PathBuf),

    #[error("Invalid rectangle on line {line}: {content:?}")]
    InvalidRectLine { line: usize, content: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CropError>;

// ============================================================
// Rectangle
// ============================================================

/// Rectangle in grid coordinates.
///
/// `x`/`y` may be negative and `width`/`height` may be zero or negative;
/// geometry is only clamped when sampling the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Build from absolute edges (`right`/`bottom` exclusive)
    pub fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self::new(left, top, right.saturating_sub(left), bottom.saturating_sub(top))
    }

    /// True when width or height is not positive
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn as_tuple(&self) -> (i32, i32, i32, i32) {
        (self.x, self.y, self.width, self.height)
    }
}

impl From<(i32, i32, i32, i32)> for Rect {
    fn from((x, y, width, height): (i32, i32, i32, i32)) -> Self {
        Self::new(x, y, width, height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.x, self.y, self.width, self.height)
    }
}

/// Error returned when a `x,y,w,h` string cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected x,y,w,h but got {0:?}")]
pub struct ParseRectError(pub String);

impl FromStr for Rect {
    type Err = ParseRectError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(ParseRectError(s.to_string()));
        }

        let mut values = [0i32; 4];
        for (slot, field) in values.iter_mut().zip(&fields) {
            *slot = field.parse().map_err(|_| ParseRectError(s.to_string()))?;
        }

        Ok(Self::new(values[0], values[1], values[2], values[3]))
    }
}

// ============================================================
// Options
// ============================================================

/// Rectangle refinement options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropOptions {
    /// Dark-rate cutoff; rows/columns with a rate above it count as dark
    pub threshold: f64,
    /// Maximum pixels scanned outward from an edge that starts on dark content
    pub search_range: u32,
    /// +/- band around the dark reference counted as "dark"
    pub tolerance: i32,
    /// Fractional padding applied to the final width/height
    pub expand_ratio: f64,
}

impl Default for CropOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            search_range: DEFAULT_SEARCH_RANGE,
            tolerance: DEFAULT_TOLERANCE,
            expand_ratio: DEFAULT_EXPAND_RATIO,
        }
    }
}

impl CropOptions {
    /// Create a new options builder
    pub fn builder() -> CropOptionsBuilder {
        CropOptionsBuilder::default()
    }

    /// Narrow tolerance band for clean, high-contrast scans
    pub fn strict() -> Self {
        Self {
            tolerance: STRICT_TOLERANCE,
            ..Default::default()
        }
    }

    /// Wide band and longer outward search for faded or noisy scans
    pub fn loose() -> Self {
        Self {
            tolerance: LOOSE_TOLERANCE,
            search_range: LOOSE_SEARCH_RANGE,
            ..Default::default()
        }
    }
}

/// Builder for CropOptions
#[derive(Debug, Default)]
pub struct CropOptionsBuilder {
    options: CropOptions,
}

impl CropOptionsBuilder {
    /// Set dark-rate threshold
    #[must_use]
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Set outward search range in pixels
    #[must_use]
    pub fn search_range(mut self, range: u32) -> Self {
        self.options.search_range = range;
        self
    }

    /// Set tolerance band; the sign is ignored
    #[must_use]
    pub fn tolerance(mut self, tolerance: i32) -> Self {
        self.options.tolerance = tolerance.saturating_abs();
        self
    }

    /// Set expansion ratio
    #[must_use]
    pub fn expand_ratio(mut self, ratio: f64) -> Self {
        self.options.expand_ratio = ratio;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> CropOptions {
        self.options
    }
}
