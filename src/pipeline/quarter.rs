//! Quartering: cut an A4 label sheet into up to four label images.
//!
//! An A4 sheet holds a 2×2 grid of 4×6 labels. The page raster is split at
//! its midpoints; quadrants with a single grey level are blank and dropped,
//! the rest are shrunk to their content with [`find_content_rect`].
//!
//! Quadrants are visited column by column (top-left, bottom-left,
//! top-right, bottom-right), which is the order carriers fill the grid in.
//! Blank quadrants leave no gap in the output, so callers must not assume
//! four images per page.

use crate::config::ConversionConfig;
use crate::error::Pdf2ZplError;
use crate::pipeline::bbox::{find_content_rect, Rect};
use crate::pipeline::render::Rasterizer;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tracing::info;

/// One cell of the 2×2 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quadrant {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl Quadrant {
    /// Visiting order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::BottomLeft,
        Quadrant::TopRight,
        Quadrant::BottomRight,
    ];

    /// Pixel bounds of this quadrant in a `width × height` page.
    pub fn bounds(self, width: u32, height: u32) -> Rect {
        let (div_w, div_h) = (width / 2, height / 2);
        match self {
            Quadrant::TopLeft => Rect::new(0, 0, div_w, div_h),
            Quadrant::BottomLeft => Rect::new(0, div_h, div_w, height),
            Quadrant::TopRight => Rect::new(div_w, 0, width, div_h),
            Quadrant::BottomRight => Rect::new(div_w, div_h, width, height),
        }
    }
}

/// A cropped label ready for the ZPL encoder.
#[derive(Debug, Clone)]
pub struct LabelImage {
    pub image: DynamicImage,
    /// 0-based index of the page the label was cut from.
    pub page_index: usize,
    pub quadrant: Quadrant,
}

fn crop(img: &DynamicImage, rect: Rect) -> DynamicImage {
    img.crop_imm(rect.left, rect.top, rect.width(), rect.height())
}

/// Split one page raster into its non-blank, content-cropped quadrants.
pub fn extract_quadrants(page: &DynamicImage, page_index: usize, padding: u32) -> Vec<LabelImage> {
    let (width, height) = (page.width(), page.height());
    let mut labels = Vec::with_capacity(4);

    for quadrant in Quadrant::ALL {
        let rect = quadrant.bounds(width, height);
        let quart = crop(page, rect);
        let gray = quart.to_luma8();

        let mut pixels = gray.as_raw().iter().copied();
        let Some(first) = pixels.next() else {
            info!("Quarter {:?} of page {} has no pixels, skipping", quadrant, page_index + 1);
            continue;
        };
        let (min, max) = pixels.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        if min == max {
            info!(
                "Quarter {},{},{},{} is empty, do not add to result",
                rect.left, rect.top, rect.right, rect.bottom
            );
            continue;
        }

        let mut shrunk = find_content_rect(&gray, padding);
        // Without padding a single inked row or column crops to nothing.
        if shrunk.width() == 0 {
            shrunk.right = (shrunk.left + 1).min(gray.width());
        }
        if shrunk.height() == 0 {
            shrunk.bottom = (shrunk.top + 1).min(gray.height());
        }
        info!(
            "Shrinked rectangle from {}x{} down to {}x{}",
            rect.width(),
            rect.height(),
            shrunk.width(),
            shrunk.height()
        );
        labels.push(LabelImage {
            image: crop(&quart, shrunk),
            page_index,
            quadrant,
        });
    }

    labels
}

/// Rasterise every page and quarter each one, keeping page order.
pub fn quarter_pages_to_images(
    pdf: &[u8],
    rasterizer: &dyn Rasterizer,
    config: &ConversionConfig,
) -> Result<Vec<LabelImage>, Pdf2ZplError> {
    let pages = rasterizer.render_pages(pdf, config.render_dpi)?;

    let mut labels = Vec::new();
    for (page_index, page) in pages.iter().enumerate() {
        info!(
            "Quartering pdf page of size {}x{} to zpl images",
            page.width(),
            page.height()
        );
        labels.extend(extract_quadrants(page, page_index, config.crop_padding));
    }
    Ok(labels)
}
