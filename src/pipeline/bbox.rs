//! Content bounding box: shrink a grayscale raster to what is printed on it.
//!
//! Quadrants of an A4 label sheet carry a lot of white margin. Printing the
//! margin would push the label off the 4×6 stock, so each quadrant is cut
//! down to the smallest rectangle holding its ink, plus some padding.
//!
//! A pixel counts as ink only when its value is exactly 0. Everything else,
//! including light anti-aliasing grey, is background. Rendered label
//! barcodes and text are solid black, so their cores always qualify.

use image::GrayImage;
use serde::{Deserialize, Serialize};

/// Pixel rectangle with exclusive `right` and `bottom` edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl Rect {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    /// True when the rectangle lies inside a `width × height` raster.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.left <= self.right
            && self.top <= self.bottom
            && self.right <= width
            && self.bottom <= height
    }
}

fn is_ink(value: u8) -> bool {
    value == 0
}

fn column_has_ink(img: &GrayImage, x: u32) -> bool {
    (0..img.height()).any(|y| is_ink(img.get_pixel(x, y)[0]))
}

fn row_has_ink(img: &GrayImage, y: u32) -> bool {
    let width = img.width() as usize;
    let start = y as usize * width;
    img.as_raw()[start..start + width].iter().any(|&v| is_ink(v))
}

/// Find the padded bounding box of the ink in `img`.
///
/// Each edge is found by scanning inwards for the first row or column
/// holding ink. The right and bottom scans stop at the left and top edges
/// already found. Edges with no ink keep their outer value, so a blank
/// raster yields the whole raster.
///
/// The result is `(left − padding, top − padding, right + padding,
/// bottom + padding)` clamped to the raster, where `right` and `bottom` are
/// the indices of the last inked column and row.
pub fn find_content_rect(img: &GrayImage, padding: u32) -> Rect {
    let (width, height) = img.dimensions();

    let left = (0..width).find(|&x| column_has_ink(img, x)).unwrap_or(0);
    let right = (left..width)
        .rev()
        .find(|&x| column_has_ink(img, x))
        .unwrap_or(width);
    let top = (0..height).find(|&y| row_has_ink(img, y)).unwrap_or(0);
    let bottom = (top..height)
        .rev()
        .find(|&y| row_has_ink(img, y))
        .unwrap_or(height);

    Rect {
        left: left.saturating_sub(padding),
        top: top.saturating_sub(padding),
        right: right.saturating_add(padding).min(width),
        bottom: bottom.saturating_add(padding).min(height),
    }
}
