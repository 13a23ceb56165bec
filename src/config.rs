//! Configuration types for PDF-to-ZPL conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The printer geometry, the A4
//! reference size and the crop padding live here instead of in module-level
//! constants so that tests (and unusual printers) can swap them.
//!
//! The three collaborators (rasterizer, page-box reader, ZPL encoder) are
//! optional pre-built trait objects. When unset the conversion falls back to
//! the pdfium / lopdf / `^GF` implementations shipped with the crate.

use crate::error::Pdf2ZplError;
use crate::pipeline::encode::{EncodeOptions, ZplEncoder};
use crate::pipeline::metadata::PageBoxReader;
use crate::pipeline::render::Rasterizer;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Printable width of a 4.25 in label at 203 DPI, in dots.
pub const PRINTER_DOTS_WIDTH: u32 = 832;
/// Printable height of a 6.0 in label at 203 DPI, in dots.
pub const PRINTER_DOTS_HEIGHT: u32 = 1218;

/// Configuration for a PDF-to-ZPL conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2zpl::{ConversionConfig, GraphicFormat};
///
/// let config = ConversionConfig::builder()
///     .printer_dots(812, 1218)
///     .format(GraphicFormat::B64)
///     .build()
///     .unwrap();
/// assert_eq!(config.printer_dots_width, 812);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Printable label width in dots. Default: 832.
    pub printer_dots_width: u32,

    /// Printable label height in dots. Default: 1218.
    pub printer_dots_height: u32,

    /// A4 reference width in points. Default: 595.
    pub a4_width_pt: f64,

    /// A4 reference height in points. Default: 842.
    pub a4_height_pt: f64,

    /// Maximum distance (exclusive) from the A4 reference size, in points,
    /// for a page to count as an A4 sheet of four labels. Default: 5.0.
    pub a4_tolerance: f64,

    /// Pixels kept around the content of a cropped quadrant. Default: 10.
    pub crop_padding: u32,

    /// DPI used to rasterize A4 sheets before quartering. Default: 200.
    pub render_dpi: u32,

    /// Maximum number of label images emitted for an A4 input. Default: 4.
    ///
    /// Quadrants past this cap (second and later pages of a multi-page A4
    /// document) are dropped with a warning.
    pub max_labels: usize,

    /// Graphic-field payload format. Default: [`GraphicFormat::Z64`].
    pub format: GraphicFormat,

    /// Error-diffusion dithering when reducing to 1-bit. Default: false.
    pub dither: bool,

    /// Print dark pixels (instead of light ones). Default: true.
    pub invert: bool,

    /// Pre-constructed rasterizer. Default: pdfium.
    pub rasterizer: Option<Arc<dyn Rasterizer>>,

    /// Pre-constructed page-box reader. Default: lopdf.
    pub page_box_reader: Option<Arc<dyn PageBoxReader>>,

    /// Pre-constructed ZPL encoder. Default: `^GF` graphic fields.
    pub encoder: Option<Arc<dyn ZplEncoder>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            printer_dots_width: PRINTER_DOTS_WIDTH,
            printer_dots_height: PRINTER_DOTS_HEIGHT,
            a4_width_pt: 595.0,
            a4_height_pt: 842.0,
            a4_tolerance: 5.0,
            crop_padding: 10,
            render_dpi: 200,
            max_labels: 4,
            format: GraphicFormat::default(),
            dither: false,
            invert: true,
            rasterizer: None,
            page_box_reader: None,
            encoder: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("printer_dots_width", &self.printer_dots_width)
            .field("printer_dots_height", &self.printer_dots_height)
            .field("a4_width_pt", &self.a4_width_pt)
            .field("a4_height_pt", &self.a4_height_pt)
            .field("a4_tolerance", &self.a4_tolerance)
            .field("crop_padding", &self.crop_padding)
            .field("render_dpi", &self.render_dpi)
            .field("max_labels", &self.max_labels)
            .field("format", &self.format)
            .field("dither", &self.dither)
            .field("invert", &self.invert)
            .field("rasterizer", &self.rasterizer.as_ref().map(|_| "<dyn Rasterizer>"))
            .field(
                "page_box_reader",
                &self.page_box_reader.as_ref().map(|_| "<dyn PageBoxReader>"),
            )
            .field("encoder", &self.encoder.as_ref().map(|_| "<dyn ZplEncoder>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Encoder options shared by both layouts.
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            dither: self.dither,
            invert: self.invert,
            format: self.format,
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn printer_dots(mut self, width: u32, height: u32) -> Self {
        self.config.printer_dots_width = width;
        self.config.printer_dots_height = height;
        self
    }

    pub fn a4_reference(mut self, width_pt: f64, height_pt: f64) -> Self {
        self.config.a4_width_pt = width_pt;
        self.config.a4_height_pt = height_pt;
        self
    }

    pub fn a4_tolerance(mut self, tolerance: f64) -> Self {
        self.config.a4_tolerance = tolerance;
        self
    }

    pub fn crop_padding(mut self, px: u32) -> Self {
        self.config.crop_padding = px;
        self
    }

    pub fn render_dpi(mut self, dpi: u32) -> Self {
        self.config.render_dpi = dpi;
        self
    }

    pub fn max_labels(mut self, n: usize) -> Self {
        self.config.max_labels = n.max(1);
        self
    }

    pub fn format(mut self, format: GraphicFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn dither(mut self, v: bool) -> Self {
        self.config.dither = v;
        self
    }

    pub fn invert(mut self, v: bool) -> Self {
        self.config.invert = v;
        self
    }

    pub fn rasterizer(mut self, rasterizer: Arc<dyn Rasterizer>) -> Self {
        self.config.rasterizer = Some(rasterizer);
        self
    }

    pub fn page_box_reader(mut self, reader: Arc<dyn PageBoxReader>) -> Self {
        self.config.page_box_reader = Some(reader);
        self
    }

    pub fn encoder(mut self, encoder: Arc<dyn ZplEncoder>) -> Self {
        self.config.encoder = Some(encoder);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2ZplError> {
        let c = &self.config;
        if c.printer_dots_width == 0 || c.printer_dots_height == 0 {
            return Err(Pdf2ZplError::InvalidConfig(format!(
                "Printable area must be non-empty, got {}x{} dots",
                c.printer_dots_width, c.printer_dots_height
            )));
        }
        if !(c.a4_width_pt > 0.0
            && c.a4_width_pt.is_finite()
            && c.a4_height_pt > 0.0
            && c.a4_height_pt.is_finite())
        {
            return Err(Pdf2ZplError::InvalidConfig(format!(
                "A4 reference size must be positive, got {}x{} pt",
                c.a4_width_pt, c.a4_height_pt
            )));
        }
        if !(c.a4_tolerance > 0.0 && c.a4_tolerance.is_finite()) {
            return Err(Pdf2ZplError::InvalidConfig(format!(
                "A4 tolerance must be a positive number, got {}",
                c.a4_tolerance
            )));
        }
        if c.render_dpi < 72 || c.render_dpi > 600 {
            return Err(Pdf2ZplError::InvalidConfig(format!(
                "Render DPI must be 72–600, got {}",
                c.render_dpi
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Payload encoding of the `^GF` graphic field.
///
/// | Format | Payload | Size |
/// |--------|---------|------|
/// | `A`    | uppercase hex, two chars per byte | 2× |
/// | `B64`  | `:B64:` base64 + CRC | ~1.33× |
/// | `Z64`  | `:Z64:` base64 of zlib + CRC (default) | smallest for labels |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GraphicFormat {
    /// ASCII hexadecimal.
    Ascii,
    /// Base64 with CRC trailer.
    B64,
    /// zlib-compressed base64 with CRC trailer. (default)
    #[default]
    Z64,
}

impl GraphicFormat {
    /// The tag as printers and upstream tools spell it.
    pub fn tag(&self) -> &'static str {
        match self {
            GraphicFormat::Ascii => "A",
            GraphicFormat::B64 => "B64",
            GraphicFormat::Z64 => "Z64",
        }
    }
}

impl fmt::Display for GraphicFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for GraphicFormat {
    type Err = Pdf2ZplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" | "ASCII" | "HEX" => Ok(GraphicFormat::Ascii),
            "B64" => Ok(GraphicFormat::B64),
            "Z64" => Ok(GraphicFormat::Z64),
            other => Err(Pdf2ZplError::InvalidConfig(format!(
                "Unknown graphic format '{other}' (expected A, B64 or Z64)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_label_printer() {
        let c = ConversionConfig::default();
        assert_eq!((c.printer_dots_width, c.printer_dots_height), (832, 1218));
        assert_eq!((c.a4_width_pt, c.a4_height_pt), (595.0, 842.0));
        assert_eq!(c.a4_tolerance, 5.0);
        assert_eq!(c.crop_padding, 10);
        assert_eq!(c.max_labels, 4);
        assert_eq!(c.format, GraphicFormat::Z64);
        assert!(!c.dither);
        assert!(c.invert);
    }

    #[test]
    fn builder_rejects_empty_printable_area() {
        let err = ConversionConfig::builder()
            .printer_dots(0, 1218)
            .build()
            .unwrap_err();
        assert!(matches!(err, Pdf2ZplError::InvalidConfig(_)));
    }

    #[test]
    fn builder_rejects_non_positive_tolerance() {
        assert!(ConversionConfig::builder().a4_tolerance(0.0).build().is_err());
        assert!(ConversionConfig::builder()
            .a4_tolerance(f64::NAN)
            .build()
            .is_err());
    }

    #[test]
    fn builder_rejects_out_of_range_render_dpi() {
        for dpi in [0, 71, 601, 10_000] {
            let err = ConversionConfig::builder().render_dpi(dpi).build().unwrap_err();
            assert!(matches!(err, Pdf2ZplError::InvalidConfig(_)), "dpi {dpi}");
        }
        for dpi in [72, 203, 600] {
            let c = ConversionConfig::builder().render_dpi(dpi).build().unwrap();
            assert_eq!(c.render_dpi, dpi);
        }
    }

    #[test]
    fn builder_rejects_bad_a4_reference() {
        for (w, h) in [(f64::NAN, 842.0), (595.0, -842.0), (0.0, 842.0), (595.0, f64::INFINITY)] {
            let err = ConversionConfig::builder().a4_reference(w, h).build().unwrap_err();
            assert!(matches!(err, Pdf2ZplError::InvalidConfig(_)), "{w}x{h}");
        }
        let c = ConversionConfig::builder()
            .a4_reference(612.0, 792.0)
            .build()
            .unwrap();
        assert_eq!((c.a4_width_pt, c.a4_height_pt), (612.0, 792.0));
    }

    #[test]
    fn builder_clamps_max_labels() {
        let c = ConversionConfig::builder().max_labels(0).build().unwrap();
        assert_eq!(c.max_labels, 1);
    }

    #[test]
    fn graphic_format_parses_tags() {
        assert_eq!("z64".parse::<GraphicFormat>().unwrap(), GraphicFormat::Z64);
        assert_eq!("B64".parse::<GraphicFormat>().unwrap(), GraphicFormat::B64);
        assert_eq!("a".parse::<GraphicFormat>().unwrap(), GraphicFormat::Ascii);
        assert!("png".parse::<GraphicFormat>().is_err());
        assert_eq!(GraphicFormat::Z64.to_string(), "Z64");
    }

    #[test]
    fn encode_options_follow_config() {
        let c = ConversionConfig::builder()
            .dither(true)
            .invert(false)
            .format(GraphicFormat::Ascii)
            .build()
            .unwrap();
        let opts = c.encode_options();
        assert!(opts.dither);
        assert!(!opts.invert);
        assert_eq!(opts.format, GraphicFormat::Ascii);
    }
}
