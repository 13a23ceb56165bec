//! Pipeline stages for PDF-to-ZPL conversion.
//!
//! Each submodule implements exactly one step. The geometry stages
//! ([`classify`], [`bbox`], [`quarter`]) are pure functions over page boxes
//! and images; the I/O stages ([`metadata`], [`render`], [`encode`]) sit
//! behind traits so the geometry can be tested without pdfium.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌─ A4 ──▶ render ──▶ quarter ──▶ bbox ──▶ encode (per label)
//! metadata ──▶ classify
//!            └─ other ──▶ fit_dpi ──▶ encode (whole PDF, one label per page)
//! ```
//!
//! 1. [`input`]   : read a path or stdin into memory, check the `%PDF` magic
//! 2. [`metadata`]: MediaBox and UserUnit of the first page
//! 3. [`classify`]: A4 sheet of four labels, or a single label per page
//! 4. [`render`]  : rasterise pages through pdfium
//! 5. [`quarter`] : split an A4 raster into quadrants, drop blank ones
//! 6. [`bbox`]    : shrink each quadrant to its printed content
//! 7. [`encode`]  : 1-bit conversion and `^GF` graphic fields

pub mod bbox;
pub mod classify;
pub mod encode;
pub mod input;
pub mod metadata;
pub mod quarter;
pub mod render;
