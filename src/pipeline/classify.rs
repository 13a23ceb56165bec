//! Page classification: A4 sheet of four labels, or one label per page.
//!
//! Carriers hand out labels in two shapes. Some produce an A4 page with up
//! to four 4×6 labels laid out in a grid; the rest produce a page that is
//! already label-sized. The first is quartered, the second is scaled so the
//! whole page fits the printable dot area of the printer.

use crate::config::ConversionConfig;
use crate::error::Pdf2ZplError;
use crate::pipeline::metadata::PageBox;
use serde::{Deserialize, Serialize};

/// How a document will be turned into labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageLayout {
    /// A4 sheet: rasterise, split into quadrants, one label per quadrant.
    A4Quartered,
    /// Label-sized page: render every page at `dpi` so it fits the label.
    Direct { dpi: u32 },
}

/// True iff both sides are strictly within `tolerance` of the A4 size
/// (595 × 842 pt).
pub fn is_a4(width: f64, height: f64, tolerance: f64) -> bool {
    is_a4_like(width, height, 595.0, 842.0, tolerance)
}

/// [`is_a4`] against an arbitrary reference size.
pub fn is_a4_like(width: f64, height: f64, ref_width: f64, ref_height: f64, tolerance: f64) -> bool {
    (width - ref_width).abs() < tolerance && (height - ref_height).abs() < tolerance
}

/// Largest integer DPI at which a `page_width_in × page_height_in` page fits
/// inside `dots_width × dots_height`.
///
/// # Errors
/// [`Pdf2ZplError::DegeneratePage`] when a side is zero, negative or not
/// finite, or when the page is so large that the DPI rounds down to 0.
pub fn fit_dpi(
    page_width_in: f64,
    page_height_in: f64,
    dots_width: u32,
    dots_height: u32,
) -> Result<u32, Pdf2ZplError> {
    for (name, side) in [("width", page_width_in), ("height", page_height_in)] {
        if !(side.is_finite() && side > 0.0) {
            return Err(Pdf2ZplError::geometry(format!(
                "page {name} is {side} in, cannot fit it onto {dots_width}x{dots_height} dots"
            )));
        }
    }

    let dpi = (f64::from(dots_width) / page_width_in)
        .min(f64::from(dots_height) / page_height_in)
        .floor();

    if dpi < 1.0 {
        return Err(Pdf2ZplError::geometry(format!(
            "page of {page_width_in:.2}x{page_height_in:.2} in needs less than 1 DPI \
             to fit onto {dots_width}x{dots_height} dots"
        )));
    }
    Ok(dpi as u32)
}

/// Decide the layout for a document whose first page has `page_box`.
pub fn classify(page_box: &PageBox, config: &ConversionConfig) -> Result<PageLayout, Pdf2ZplError> {
    if is_a4_like(
        page_box.width(),
        page_box.height(),
        config.a4_width_pt,
        config.a4_height_pt,
        config.a4_tolerance,
    ) {
        return Ok(PageLayout::A4Quartered);
    }

    let dpi = fit_dpi(
        page_box.width_in(),
        page_box.height_in(),
        config.printer_dots_width,
        config.printer_dots_height,
    )?;
    Ok(PageLayout::Direct { dpi })
}
