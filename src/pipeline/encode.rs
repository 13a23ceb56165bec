//! ZPL encoding: raster → 1-bit `^GF` graphic field wrapped in a label.
//!
//! Thermal printers only know "burn" and "don't burn", so every image is
//! reduced to one bit per dot first: a fixed threshold at mid-grey, or
//! Floyd–Steinberg error diffusion when dithering is asked for. With
//! `invert` set a bit is burned for every dark pixel, which is what a label
//! rendered black-on-white needs.
//!
//! The bitmap is sent as `^GFA,<total>,<total>,<row>,<payload>`, with the
//! payload in one of the three [`GraphicFormat`]s. The base64 formats end
//! with a CRC-16/XMODEM of the base64 text, as printers expect.

use crate::config::GraphicFormat;
use crate::error::Pdf2ZplError;
use crate::pipeline::render::{PdfiumRasterizer, Rasterizer};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::DynamicImage;
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;
use tracing::debug;

/// Options for a single encoder call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub dither: bool,
    pub invert: bool,
    pub format: GraphicFormat,
}

/// Turns rasters and whole documents into ZPL text.
pub trait ZplEncoder: Send + Sync {
    /// Encode one image as one label.
    fn encode_image(&self, image: &DynamicImage, options: &EncodeOptions)
        -> Result<String, Pdf2ZplError>;

    /// Render `pdf` at `dpi` and encode every page. With `split_pages` each
    /// page is its own label; otherwise all pages go on one label, stacked.
    fn encode_pdf(
        &self,
        pdf: &[u8],
        options: &EncodeOptions,
        split_pages: bool,
        dpi: u32,
    ) -> Result<String, Pdf2ZplError>;
}

/// 1-bit bitmap, rows packed MSB-first and padded to whole bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: usize,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Reduce `image` to one bit per pixel. Transparent pixels count as
    /// white paper.
    pub fn from_image(image: &DynamicImage, dither: bool, invert: bool) -> Self {
        let (width, height) = (image.width(), image.height());
        let la = image.to_luma_alpha8();
        let mut levels: Vec<i32> = la
            .pixels()
            .map(|p| {
                let (l, a) = (i32::from(p[0]), i32::from(p[1]));
                (l * a + 255 * (255 - a)) / 255
            })
            .collect();

        let (w, h) = (width as usize, height as usize);
        let bytes_per_row = w.div_ceil(8);
        let mut data = vec![0u8; bytes_per_row * h];

        for y in 0..h {
            for x in 0..w {
                let old = levels[y * w + x];
                let white = old >= 128;
                if dither {
                    let err = old - if white { 255 } else { 0 };
                    let mut spread = |dx: isize, dy: usize, weight: i32| {
                        let nx = x as isize + dx;
                        let ny = y + dy;
                        if nx >= 0 && (nx as usize) < w && ny < h {
                            levels[ny * w + nx as usize] += err * weight / 16;
                        }
                    };
                    spread(1, 0, 7);
                    spread(-1, 1, 3);
                    spread(0, 1, 5);
                    spread(1, 1, 1);
                }
                if white != invert {
                    data[y * bytes_per_row + x / 8] |= 0x80 >> (x % 8);
                }
            }
        }

        Self {
            width,
            height,
            bytes_per_row,
            data,
        }
    }

    /// The `^GFA,…` command (without `^FO`/`^FS`).
    pub fn to_graphic_field(&self, format: GraphicFormat) -> Result<String, Pdf2ZplError> {
        let payload = match format {
            GraphicFormat::Ascii => {
                let mut hex = String::with_capacity(self.data.len() * 2);
                for byte in &self.data {
                    let _ = write!(hex, "{byte:02X}");
                }
                hex
            }
            GraphicFormat::B64 => crc_framed("B64", &STANDARD.encode(&self.data)),
            GraphicFormat::Z64 => {
                let mut z = ZlibEncoder::new(Vec::new(), Compression::default());
                z.write_all(&self.data).map_err(zlib_failed)?;
                let compressed = z.finish().map_err(zlib_failed)?;
                crc_framed("Z64", &STANDARD.encode(compressed))
            }
        };
        let total = self.data.len();
        Ok(format!(
            "^GFA,{total},{total},{},{payload}",
            self.bytes_per_row
        ))
    }
}

fn zlib_failed(e: std::io::Error) -> Pdf2ZplError {
    Pdf2ZplError::EncodingFailed {
        detail: format!("zlib: {e}"),
    }
}

fn crc_framed(tag: &str, b64: &str) -> String {
    format!(":{tag}:{b64}:{:04x}", crc16_xmodem(b64.as_bytes()))
}

/// CRC-16/XMODEM (poly 0x1021, init 0).
pub fn crc16_xmodem(data: &[u8]) -> u16 {
    data.iter().fold(0u16, |mut crc, &byte| {
        crc ^= u16::from(byte) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
        crc
    })
}

/// Wrap positioned graphic fields (`(y, field)`) in one `^XA … ^XZ` label.
fn label(fields: &[(u32, String)]) -> String {
    let mut zpl = String::from("^XA\n");
    for (y, field) in fields {
        let _ = writeln!(zpl, "^FO0,{y}{field}^FS");
    }
    zpl.push_str("^XZ\n");
    zpl
}

/// The default [`ZplEncoder`]: plain `^GF` graphic fields.
///
/// Whole documents are rendered with the wrapped [`Rasterizer`].
#[derive(Clone)]
pub struct GraphicFieldEncoder {
    rasterizer: Arc<dyn Rasterizer>,
}

impl GraphicFieldEncoder {
    pub fn new(rasterizer: Arc<dyn Rasterizer>) -> Self {
        Self { rasterizer }
    }

    fn field(image: &DynamicImage, options: &EncodeOptions) -> Result<String, Pdf2ZplError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Pdf2ZplError::EncodingFailed {
                detail: format!("cannot encode an empty {}x{} image", image.width(), image.height()),
            });
        }
        let bitmap = Bitmap::from_image(image, options.dither, options.invert);
        debug!(
            "Encoding {}x{} image as {} bytes of {}",
            bitmap.width,
            bitmap.height,
            bitmap.data.len(),
            options.format
        );
        bitmap.to_graphic_field(options.format)
    }
}

impl Default for GraphicFieldEncoder {
    fn default() -> Self {
        Self::new(Arc::new(PdfiumRasterizer))
    }
}

impl ZplEncoder for GraphicFieldEncoder {
    fn encode_image(
        &self,
        image: &DynamicImage,
        options: &EncodeOptions,
    ) -> Result<String, Pdf2ZplError> {
        Ok(label(&[(0, Self::field(image, options)?)]))
    }

    fn encode_pdf(
        &self,
        pdf: &[u8],
        options: &EncodeOptions,
        split_pages: bool,
        dpi: u32,
    ) -> Result<String, Pdf2ZplError> {
        let pages = self.rasterizer.render_pages(pdf, dpi)?;
        if pages.is_empty() {
            return Err(Pdf2ZplError::NoPages);
        }

        if split_pages {
            let mut zpl = String::new();
            for page in &pages {
                zpl.push_str(&label(&[(0, Self::field(page, options)?)]));
            }
            return Ok(zpl);
        }

        let mut fields = Vec::with_capacity(pages.len());
        let mut y = 0;
        for page in &pages {
            fields.push((y, Self::field(page, options)?));
            y += page.height();
        }
        Ok(label(&fields))
    }
}
