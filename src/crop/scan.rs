//! Row / column dark-rate scanning

use super::grid::LumaGrid;

/// Orientation of a scan line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAxis {
    /// Fixed `y`, scanning `x`
    Row,
    /// Fixed `x`, scanning `y`
    Column,
}

/// Inclusive luminance band counted as "dark"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DarkBand {
    pub lower: u8,
    pub upper: u8,
}

impl DarkBand {
    /// Band of `reference +/- |tolerance|`, clamped to 0..=255
    pub fn new(reference: u8, tolerance: i32) -> Self {
        let reference = i64::from(reference);
        let tolerance = i64::from(tolerance).abs();

        Self {
            lower: (reference - tolerance).clamp(0, 255) as u8,
            upper: (reference + tolerance).clamp(0, 255) as u8,
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        (self.lower..=self.upper).contains(&value)
    }
}

/// Fraction of in-bounds samples on one scan line that fall inside `band`.
///
/// `index` is the fixed coordinate (y for a row, x for a column) and
/// `start..end` the scanned span. Samples outside the grid are left out of
/// the denominator; an empty line yields 0.0.
pub fn dark_rate(
    grid: &LumaGrid,
    axis: ScanAxis,
    index: i32,
    start: i32,
    end: i32,
    band: DarkBand,
) -> f64 {
    let in_bounds = match axis {
        ScanAxis::Row => grid.contains_y(index),
        ScanAxis::Column => grid.contains_x(index),
    };
    if !in_bounds {
        return 0.0;
    }

    let span = match axis {
        ScanAxis::Row => grid.column_span(start, end),
        ScanAxis::Column => grid.row_span(start, end),
    };

    let mut dark = 0usize;
    let mut total = 0usize;
    for position in span {
        let sample = match axis {
            ScanAxis::Row => grid.get(position, index),
            ScanAxis::Column => grid.get(index, position),
        };
        if let Some(value) = sample {
            total += 1;
            if band.contains(value) {
                dark += 1;
            }
        }
    }

    if total == 0 {
        return 0.0;
    }
    dark as f64 / total as f64
}
