//! Batch refinement
//!
//! Applies the refiner to every rectangle of a list against one image and
//! reports GIVEN/FIXED pairs.

use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::crop::{CropOptions, LumaGrid, Rect, RectRefiner, Result};
use crate::rect_list::{read_rect_list, RectEntry};

/// One refined rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RefinedEntry {
    /// Source line in the rectangle list (0 for rectangles given directly)
    pub line: usize,
    pub given: Rect,
    pub fixed: Rect,
}

/// Result of refining a batch of rectangles on one image
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub image: Option<PathBuf>,
    pub image_size: (u32, u32),
    pub options: CropOptions,
    pub entries: Vec<RefinedEntry>,
}

impl BatchReport {
    /// Write `GIVEN:`/`FIXED:` pairs followed by a completion line
    pub fn write_text(&self, mut out: impl Write) -> std::io::Result<()> {
        for entry in &self.entries {
            writeln!(out, "GIVEN:\t{}", entry.given)?;
            writeln!(out, "FIXED:\t{}", entry.fixed)?;
        }
        writeln!(out, "Processing Completed.")
    }

    /// Write the report as pretty-printed JSON
    pub fn write_json(&self, mut out: impl Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut out, self)?;
        writeln!(out)
    }

    /// Number of refined rectangles with non-positive width or height
    pub fn degenerate_count(&self) -> usize {
        self.entries.iter().filter(|e| e.fixed.is_degenerate()).count()
    }
}

/// Drives a [`RectRefiner`] over rectangle lists
#[derive(Debug, Clone, Default)]
pub struct BatchRefiner {
    refiner: RectRefiner,
}

impl BatchRefiner {
    pub fn new(options: CropOptions) -> Self {
        Self {
            refiner: RectRefiner::new(options),
        }
    }

    /// Decode `image_path`, read `rect_list_path` and refine every entry
    pub fn process_files(&self, image_path: &Path, rect_list_path: &Path) -> Result<BatchReport> {
        let entries = read_rect_list(rect_list_path)?;
        self.process_image(image_path, &entries)
    }

    /// Decode `image_path` and refine the given entries
    pub fn process_image(&self, image_path: &Path, entries: &[RectEntry]) -> Result<BatchReport> {
        let grid = LumaGrid::open(image_path)?;
        let mut report = self.process(&grid, entries);
        report.image = Some(image_path.to_path_buf());
        Ok(report)
    }

    /// Refine entries against an already converted grid
    pub fn process(&self, grid: &LumaGrid, entries: &[RectEntry]) -> BatchReport {
        let rects: Vec<Rect> = entries.iter().map(|e| e.rect).collect();
        let fixed = self.refiner.refine_all(grid, &rects);

        let entries: Vec<RefinedEntry> = entries
            .iter()
            .zip(fixed)
            .map(|(entry, fixed)| RefinedEntry {
                line: entry.line,
                given: entry.rect,
                fixed,
            })
            .collect();

        for entry in &entries {
            tracing::info!(line = entry.line, given = %entry.given, fixed = %entry.fixed, "refined");
            if entry.fixed.is_degenerate() {
                tracing::warn!(line = entry.line, fixed = %entry.fixed, "degenerate rectangle");
            }
        }

        BatchReport {
            image: None,
            image_size: (grid.width(), grid.height()),
            options: *self.refiner.options(),
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crop::CropError;
    use crate::rect_list::parse_rect_list;
    use image::{Rgb, RgbImage};

    fn page() -> RgbImage {
        let mut img = RgbImage::from_pixel(100, 100, Rgb([255, 255, 255]));
        for y in 20..30 {
            for x in 20..60 {
                img.put_pixel(x, y, Rgb([0, 0, 0]));
            }
        }
        img
    }

    #[test]
    fn test_process_grid() {
        let grid = LumaGrid::from_rgb(&page());
        let entries = parse_rect_list("15,18,49,13\n25,22,10,4\n").unwrap();

        let report = BatchRefiner::default().process(&grid, &entries);
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.image_size, (100, 100));
        assert_eq!(report.entries[0].given, Rect::new(15, 18, 49, 13));
        assert_eq!(report.entries[0].fixed, Rect::new(16, 19, 48, 12));
        assert_eq!(report.entries[1].line, 2);
        assert_eq!(report.entries[1].fixed, Rect::new(18, 19, 18, 7));
        assert_eq!(report.degenerate_count(), 0);
    }

    #[test]
    fn test_write_text() {
        let grid = LumaGrid::from_rgb(&page());
        let entries = parse_rect_list("15,18,49,13\n").unwrap();
        let report = BatchRefiner::default().process(&grid, &entries);

        let mut out = Vec::new();
        report.write_text(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "GIVEN:\t15,18,49,13\nFIXED:\t16,19,48,12\nProcessing Completed.\n"
        );
    }

    #[test]
    fn test_write_json() {
        let grid = LumaGrid::from_rgb(&page());
        let entries = parse_rect_list("15,18,49,13\n").unwrap();
        let report = BatchRefiner::default().process(&grid, &entries);

        let mut out = Vec::new();
        report.write_json(&mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["entries"][0]["fixed"]["x"], 16);
        assert_eq!(value["entries"][0]["line"], 1);
        assert_eq!(value["options"]["search_range"], 20);
    }

    #[test]
    fn test_process_files() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("page.png");
        let list_path = dir.path().join("page.txt");
        page().save(&image_path).unwrap();
        std::fs::write(&list_path, "15,18,49,13\n").unwrap();

        let report = BatchRefiner::default()
            .process_files(&image_path, &list_path)
            .unwrap();
        assert_eq!(report.image.as_deref(), Some(image_path.as_path()));
        assert_eq!(report.entries[0].fixed, Rect::new(16, 19, 48, 12));
    }

    #[test]
    fn test_process_files_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let list_path = dir.path().join("page.txt");
        std::fs::write(&list_path, "1,1,1,1\n").unwrap();

        let result =
            BatchRefiner::default().process_files(Path::new("/nonexistent/page.png"), &list_path);
        assert!(matches!(result, Err(CropError::ImageNotFound(_))));
    }

    #[test]
    fn test_degenerate_count() {
        let grid = LumaGrid::filled(20, 20, 255);
        let entries = parse_rect_list("5,5,0,0\n5,5,4,4\n").unwrap();
        let report = BatchRefiner::default().process(&grid, &entries);
        assert_eq!(report.degenerate_count(), 1);
    }
}
