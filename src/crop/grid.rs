//! Luminance grid
//!
//! Read-only 2D grid of luminance samples the refiner operates on.
//! Samples are addressed as `(x, y)` with signed coordinates so callers can
//! read outside the image without bounds checks of their own.

use image::{DynamicImage, GrayImage, RgbImage};
use std::ops::Range;
use std::path::Path;

use super::types::{CropError, Result};

/// ITU-R BT.601 luma weights
const RED_WEIGHT: f64 = 0.299;
const GREEN_WEIGHT: f64 = 0.587;
const BLUE_WEIGHT: f64 = 0.114;

/// Grayscale sample grid, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LumaGrid {
    width: u32,
    height: u32,
    /// Row-major samples, `width * height` long
    samples: Vec<u8>,
}

impl LumaGrid {
    /// Wrap row-major samples
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if samples.len() != expected {
            return Err(CropError::InvalidGrid(format!(
                "expected {} samples for {}x{}, got {}",
                expected,
                width,
                height,
                samples.len()
            )));
        }

        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every sample
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> u8) -> Self {
        let mut samples = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                samples.push(f(x, y));
            }
        }

        Self {
            width,
            height,
            samples,
        }
    }

    /// Grid with every sample set to `value`
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            samples: vec![value; width as usize * height as usize],
        }
    }

    /// Convert an RGB image: `floor(0.299R + 0.587G + 0.114B)`
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let samples = image.pixels().map(|p| luma(p.0)).collect();

        Self {
            width,
            height,
            samples,
        }
    }

    /// Convert any decoded image; alpha is discarded
    pub fn from_dynamic(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageRgb8(rgb) => Self::from_rgb(rgb),
            other => Self::from_rgb(&other.to_rgb8()),
        }
    }

    /// Use an existing grayscale image as-is
    pub fn from_gray(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();

        Self {
            width,
            height,
            samples: image.as_raw().clone(),
        }
    }

    /// Decode an image file and convert it to luminance
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CropError::ImageNotFound(path.to_path_buf()));
        }

        let image = image::open(path).map_err(|e| CropError::InvalidImage(e.to_string()))?;
        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            "decoded image"
        );

        Ok(Self::from_dynamic(&image))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when `(x, y)` addresses a sample
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.contains_x(x) && self.contains_y(y)
    }

    pub(crate) fn contains_x(&self, x: i32) -> bool {
        x >= 0 && (x as u32) < self.width
    }

    pub(crate) fn contains_y(&self, y: i32) -> bool {
        y >= 0 && (y as u32) < self.height
    }

    /// `start..end` cut down to the grid's columns
    pub(crate) fn column_span(&self, start: i32, end: i32) -> Range<i32> {
        clamp_span(start, end, self.width)
    }

    /// `start..end` cut down to the grid's rows
    pub(crate) fn row_span(&self, start: i32, end: i32) -> Range<i32> {
        clamp_span(start, end, self.height)
    }

    /// Sample at `(x, y)`, `None` outside the grid
    pub fn get(&self, x: i32, y: i32) -> Option<u8> {
        if !self.contains(x, y) {
            return None;
        }
        let index = y as usize * self.width as usize + x as usize;
        self.samples.get(index).copied()
    }
}

fn luma([r, g, b]: [u8; 3]) -> u8 {
    let value = RED_WEIGHT * f64::from(r) + GREEN_WEIGHT * f64::from(g) + BLUE_WEIGHT * f64::from(b);
    value.floor() as u8
}

fn clamp_span(start: i32, end: i32, len: u32) -> Range<i32> {
    let len = i32::try_from(len).unwrap_or(i32::MAX);
    start.max(0)..end.min(len)
}
