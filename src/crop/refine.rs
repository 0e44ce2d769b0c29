//! Rectangle refinement
//!
//! # Algorithm
//!
//! 1. Estimate the dark reference once from the initial rectangle
//! 2. Move the top edge: down to the first dark row if the top row is light,
//!    otherwise up (at most `search_range` rows) to the first light row
//! 3. Find the bottom edge: first light row below the top edge
//! 4. Move the left edge the same way as the top edge, using the refined
//!    rows as the column span and requiring `skip` consecutive qualifying
//!    columns before the move is accepted
//! 5. Find the right edge: first light column run right of the left edge
//! 6. Pad the result by `expand_ratio` on every side
//!
//! Edges that find no transition keep the input rectangle's edge.

use rayon::prelude::*;

use super::darkness::darkness_sample;
use super::grid::LumaGrid;
use super::scan::{dark_rate, DarkBand, ScanAxis};
use super::types::{CropOptions, Rect, SKIP_WIDTH_DIVISOR};

/// Refines rough rectangles so they frame the dark content they contain
#[derive(Debug, Clone, Default)]
pub struct RectRefiner {
    options: CropOptions,
}

impl RectRefiner {
    pub fn new(options: CropOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CropOptions {
        &self.options
    }

    /// Search edges and pad the result
    pub fn refine(&self, grid: &LumaGrid, rect: &Rect) -> Rect {
        self.expand(&self.search(grid, rect))
    }

    /// Refine every rectangle against the same grid, preserving order
    pub fn refine_all(&self, grid: &LumaGrid, rects: &[Rect]) -> Vec<Rect> {
        rects.par_iter().map(|rect| self.refine(grid, rect)).collect()
    }

    /// Locate the four edges of the dark region without padding.
    ///
    /// A rectangle that does not overlap the grid at all is returned unchanged.
    pub fn search(&self, grid: &LumaGrid, rect: &Rect) -> Rect {
        let Some(reference) = darkness_sample(grid, rect) else {
            tracing::trace!(%rect, "rectangle outside grid, edges kept");
            return *rect;
        };

        let search = EdgeSearch {
            grid,
            origin: *rect,
            band: DarkBand::new(reference, self.options.tolerance),
            threshold: self.options.threshold,
            search_range: i32::try_from(self.options.search_range).unwrap_or(i32::MAX),
            skip: (rect.width / SKIP_WIDTH_DIVISOR).max(1),
        };

        let top = search.top_edge();
        let bottom = search.bottom_edge(top);
        let left = search.left_edge(top, bottom);
        let right = search.right_edge(left, top, bottom);

        let found = Rect::from_edges(left, top, right, bottom);
        tracing::trace!(given = %rect, found = %found, reference, "edges located");
        found
    }

    /// Pad `rect` by `floor(size * expand_ratio)` on each side
    pub fn expand(&self, rect: &Rect) -> Rect {
        let ratio = self.options.expand_ratio;
        let expand_x = (f64::from(rect.width) * ratio).floor() as i32;
        let expand_y = (f64::from(rect.height) * ratio).floor() as i32;

        Rect::new(
            rect.x.saturating_sub(expand_x),
            rect.y.saturating_sub(expand_y),
            rect.width.saturating_add(expand_x.saturating_mul(2)),
            rect.height.saturating_add(expand_y.saturating_mul(2)),
        )
    }
}

/// Per-call search state; every field is fixed for the duration of one `search`
struct EdgeSearch<'a> {
    grid: &'a LumaGrid,
    origin: Rect,
    band: DarkBand,
    threshold: f64,
    search_range: i32,
    skip: i32,
}

impl EdgeSearch<'_> {
    fn row_is_dark(&self, y: i32) -> bool {
        let rate = dark_rate(
            self.grid,
            ScanAxis::Row,
            y,
            self.origin.x,
            self.origin.right(),
            self.band,
        );
        rate > self.threshold
    }

    fn column_is_dark(&self, x: i32, top: i32, bottom: i32) -> bool {
        let rate = dark_rate(self.grid, ScanAxis::Column, x, top, bottom, self.band);
        rate > self.threshold
    }

    /// `from`, `from - 1`, ... stopping after `search_range` positions or at 0
    fn outward(&self, from: i32) -> impl Iterator<Item = i32> {
        let last = from.saturating_sub(self.search_range).saturating_add(1);
        (last..=from).rev().take_while(|&position| position >= 0)
    }

    fn top_edge(&self) -> i32 {
        let y = self.origin.y;
        let edge = if self.row_is_dark(y) {
            self.outward(y).find(|&yy| !self.row_is_dark(yy))
        } else {
            (y..self.origin.bottom()).find(|&yy| self.row_is_dark(yy))
        };

        let top = edge.unwrap_or(y);
        tracing::trace!(from = y, to = top, "top edge");
        top
    }

    fn bottom_edge(&self, top: i32) -> i32 {
        let end = top.saturating_add(self.origin.height);
        let bottom = (top.saturating_add(1)..end)
            .find(|&yy| !self.row_is_dark(yy))
            .unwrap_or(self.origin.bottom());
        tracing::trace!(top, bottom, "bottom edge");
        bottom
    }

    fn left_edge(&self, top: i32, bottom: i32) -> i32 {
        let x = self.origin.x;
        let edge = if self.column_is_dark(x, top, bottom) {
            self.gated_edge(self.outward(x), |xx| !self.column_is_dark(xx, top, bottom))
        } else {
            self.gated_edge(x..self.origin.right(), |xx| {
                self.column_is_dark(xx, top, bottom)
            })
        };

        let left = edge.unwrap_or(x);
        tracing::trace!(from = x, to = left, skip = self.skip, "left edge");
        left
    }

    fn right_edge(&self, left: i32, top: i32, bottom: i32) -> i32 {
        let end = left.saturating_add(self.origin.width);
        let right = self
            .gated_edge(left.saturating_add(1)..end, |xx| {
                !self.column_is_dark(xx, top, bottom)
            })
            .unwrap_or(self.origin.right());
        tracing::trace!(left, right, skip = self.skip, "right edge");
        right
    }

    /// Walk `positions` until `skip` consecutive positions qualify.
    ///
    /// Each qualifying position that starts a new run becomes the tentative
    /// edge; a non-qualifying position resets the counter. Returns the last
    /// tentative edge, or `None` when nothing qualified.
    ///
    /// The edge is pinned to the first position of the run on purpose, not
    /// to the position where the counter runs out.
    fn gated_edge(
        &self,
        positions: impl Iterator<Item = i32>,
        qualifies: impl Fn(i32) -> bool,
    ) -> Option<i32> {
        let mut edge = None;
        let mut remaining = self.skip;
        let mut in_run = false;

        for position in positions {
            if !qualifies(position) {
                remaining = self.skip;
                in_run = false;
                continue;
            }

            if !in_run {
                edge = Some(position);
                in_run = true;
            }
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }

        edge
    }
}
