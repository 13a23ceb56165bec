//! Error types for the pdf2zpl library.
//!
//! A single fatal error type, [`Pdf2ZplError`], covers every way a
//! conversion can fail. There is no partial result: a sheet with one
//! quadrant missing prints the wrong parcels, so every variant aborts the
//! whole request.
//!
//! The variants fall into five groups:
//!
//! | Group | Variants |
//! |-------|----------|
//! | Input | [`FileNotFound`], [`PermissionDenied`], [`NotAPdf`], [`ReadFailed`] |
//! | Parse | [`CorruptPdf`], [`NoPages`] |
//! | Geometry | [`DegeneratePage`] |
//! | Rasterization | [`RasterisationFailed`], [`PdfiumBindingFailed`] |
//! | Encoding | [`EncodingFailed`] |
//!
//! [`FileNotFound`]: Pdf2ZplError::FileNotFound
//! [`PermissionDenied`]: Pdf2ZplError::PermissionDenied
//! [`NotAPdf`]: Pdf2ZplError::NotAPdf
//! [`ReadFailed`]: Pdf2ZplError::ReadFailed
//! [`CorruptPdf`]: Pdf2ZplError::CorruptPdf
//! [`NoPages`]: Pdf2ZplError::NoPages
//! [`DegeneratePage`]: Pdf2ZplError::DegeneratePage
//! [`RasterisationFailed`]: Pdf2ZplError::RasterisationFailed
//! [`PdfiumBindingFailed`]: Pdf2ZplError::PdfiumBindingFailed
//! [`EncodingFailed`]: Pdf2ZplError::EncodingFailed

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf2zpl library.
#[derive(Debug, Error)]
pub enum Pdf2ZplError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input was read, but is not a PDF.
    #[error("Input '{source_name}' is not a valid PDF\nFirst bytes: {magic:?}")]
    NotAPdf { source_name: String, magic: Vec<u8> },

    /// Reading the input stream failed half-way.
    #[error("Failed to read '{source_name}': {source}")]
    ReadFailed {
        source_name: String,
        #[source]
        source: std::io::Error,
    },

    // ── Parse errors ──────────────────────────────────────────────────────
    /// PDF header/trailer/xref or the page tree cannot be parsed.
    #[error("PDF is corrupt: {detail}")]
    CorruptPdf { detail: String },

    /// The document parsed but contains no pages.
    #[error("PDF has no pages")]
    NoPages,

    // ── Geometry errors ───────────────────────────────────────────────────
    /// The page box cannot be scaled onto the printable area.
    #[error("Degenerate page geometry: {detail}")]
    DegeneratePage { detail: String },

    // ── Rasterization errors ──────────────────────────────────────────────
    /// pdfium-render returned an error for a specific page (1-based).
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install libpdfium for your platform or point PDFIUM_LIB_PATH at an\n\
existing copy (either the library file or the directory holding it).\n"
    )]
    PdfiumBindingFailed(String),

    // ── Encoding errors ───────────────────────────────────────────────────
    /// The ZPL encoder rejected an image or document.
    #[error("ZPL encoding failed: {detail}")]
    EncodingFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output ZPL file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2ZplError {
    /// Shorthand for a [`Pdf2ZplError::DegeneratePage`].
    pub(crate) fn geometry(detail: impl Into<String>) -> Self {
        Pdf2ZplError::DegeneratePage {
            detail: detail.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rasterisation_display_names_page() {
        let e = Pdf2ZplError::RasterisationFailed {
            page: 3,
            detail: "bitmap alloc".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("bitmap alloc"));
    }

    #[test]
    fn not_a_pdf_shows_magic() {
        let e = Pdf2ZplError::NotAPdf {
            source_name: "<stdin>".into(),
            magic: b"GIF8".to_vec(),
        };
        let msg = e.to_string();
        assert!(msg.contains("<stdin>"));
        assert!(msg.contains("[71, 73, 70, 56]"), "got: {msg}");
    }

    #[test]
    fn geometry_helper_builds_degenerate_page() {
        let e = Pdf2ZplError::geometry("width is 0");
        assert!(matches!(e, Pdf2ZplError::DegeneratePage { .. }));
        assert!(e.to_string().contains("width is 0"));
    }

    #[test]
    fn read_failed_keeps_source() {
        use std::error::Error as _;
        let e = Pdf2ZplError::ReadFailed {
            source_name: "label.pdf".into(),
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof"),
        };
        assert!(e.source().is_some());
    }
}
