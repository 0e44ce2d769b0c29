//! Dark reference estimation
//!
//! The reference is the stricter of the window's average and minimum
//! luminance, which pulls it toward the ink color even when the window
//! contains a lot of background.

use super::grid::LumaGrid;
use super::types::Rect;

/// Dark reference of `rect`, or `None` if it does not overlap the grid
pub fn darkness_sample(grid: &LumaGrid, rect: &Rect) -> Option<u8> {
    let mut total: u64 = 0;
    let mut count: u64 = 0;
    let mut min_value = u8::MAX;

    for y in grid.row_span(rect.y, rect.bottom()) {
        for x in grid.column_span(rect.x, rect.right()) {
            let Some(value) = grid.get(x, y) else {
                continue;
            };
            total += u64::from(value);
            count += 1;
            min_value = min_value.min(value);
        }
    }

    if count == 0 {
        return None;
    }

    let average = (total / count) as u8;
    Some(average.min(min_value))
}

/// Dark reference of `rect`; 0 when it does not overlap the grid
pub fn darkest_average(grid: &LumaGrid, rect: &Rect) -> u8 {
    darkness_sample(grid, rect).unwrap_or(0)
}
