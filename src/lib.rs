//! # pdf2zpl
//!
//! Convert PDF shipping labels to ZPL for Zebra thermal printers.
//!
//! ## Why this crate?
//!
//! Carriers hand out labels in two shapes: an A4 page holding up to four
//! 4×6 labels in a grid, or a page that already is one label. A thermal
//! printer loaded with 4×6 stock can print neither as-is. This crate detects
//! which shape it got, cuts A4 sheets into their non-blank quadrants
//! (cropped tightly to their content), and scales label-sized pages so they
//! fill the printable area without overflowing it.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     read a file or stdin, check the %PDF header
//!  ├─ 2. Metadata  MediaBox + UserUnit of page 0 (lopdf)
//!  ├─ 3. Classify  A4 sheet? else largest DPI that fits 832×1218 dots
//!  ├─ 4a. A4       render (pdfium) → quarter → crop → encode each label
//!  ├─ 4b. Direct   render every page at the fitted DPI → encode
//!  └─ 5. Output    concatenated ^XA … ^XZ labels
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2zpl::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("label.pdf", &config).await?;
//!     print!("{}", output.zpl);
//!     eprintln!("{} labels", output.label_count());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2zpl` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2zpl = { version = "0.1", default-features = false }
//! ```
//!
//! ## Plugging in other backends
//!
//! Rendering, page-box reading and ZPL encoding sit behind the
//! [`Rasterizer`], [`PageBoxReader`] and [`ZplEncoder`] traits. Pass your
//! own through [`ConversionConfigBuilder`]; unset ones default to pdfium,
//! lopdf and [`GraphicFieldEncoder`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ConversionConfig, ConversionConfigBuilder, GraphicFormat};
pub use convert::{convert, convert_bytes, convert_from_bytes, convert_sync, convert_to_file, inspect};
pub use error::Pdf2ZplError;
pub use output::{ConversionOutput, ConversionStats, Fragment, FragmentSource, Inspection, LabelJob};
pub use pipeline::bbox::{find_content_rect, Rect};
pub use pipeline::classify::{fit_dpi, is_a4, PageLayout};
pub use pipeline::encode::{EncodeOptions, GraphicFieldEncoder, ZplEncoder};
pub use pipeline::metadata::{LopdfPageBoxReader, PageBox, PageBoxReader};
pub use pipeline::quarter::{extract_quadrants, quarter_pages_to_images, LabelImage, Quadrant};
pub use pipeline::render::{PdfiumRasterizer, Rasterizer};
