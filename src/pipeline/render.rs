//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! Rendering is blocking and CPU-bound; the async entry points in
//! [`crate::convert`] already run the whole conversion on Tokio's blocking
//! pool, so this module stays synchronous.
//!
//! ## Binding pdfium
//!
//! `PDFIUM_LIB_PATH` may name the library file itself or the directory that
//! holds it. Without it the system library search path is used.

use crate::error::Pdf2ZplError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::Path;
use tracing::{debug, info};

/// Turns every page of a PDF held in memory into a raster, in page order.
pub trait Rasterizer: Send + Sync {
    fn render_pages(&self, pdf: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, Pdf2ZplError>;
}

/// [`Rasterizer`] backed by pdfium-render.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumRasterizer;

impl Rasterizer for PdfiumRasterizer {
    fn render_pages(&self, pdf: &[u8], dpi: u32) -> Result<Vec<DynamicImage>, Pdf2ZplError> {
        let pdfium = bind_pdfium()?;

        let document = pdfium
            .load_pdf_from_byte_slice(pdf, None)
            .map_err(|e| Pdf2ZplError::CorruptPdf {
                detail: format!("{:?}", e),
            })?;

        let pages = document.pages();
        let total_pages = pages.len() as usize;
        if total_pages == 0 {
            return Err(Pdf2ZplError::NoPages);
        }
        info!("Rendering {} pages at {} dpi", total_pages, dpi);

        // PDF user space is 72 units per inch.
        let render_config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / 72.0);

        let mut results = Vec::with_capacity(total_pages);
        for (idx, page) in pages.iter().enumerate() {
            let bitmap = page.render_with_config(&render_config).map_err(|e| {
                Pdf2ZplError::RasterisationFailed {
                    page: idx + 1,
                    detail: format!("{:?}", e),
                }
            })?;

            let image = bitmap.as_image();
            debug!(
                "Rendered page {} → {}x{} px",
                idx + 1,
                image.width(),
                image.height()
            );
            results.push(image);
        }

        Ok(results)
    }
}

/// Bind to pdfium, honouring `PDFIUM_LIB_PATH`.
pub fn bind_pdfium() -> Result<Pdfium, Pdf2ZplError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(path) if !path.is_empty() => {
            let path = Path::new(&path);
            if path.is_dir() {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(path))
            } else {
                Pdfium::bind_to_library(path)
            }
        }
        _ => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| Pdf2ZplError::PdfiumBindingFailed(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}
